// src/bundle/mod.rs
//! Model bundle loading.
//!
//! The bundle is the trained pipeline: scaler, principal components,
//! classifier, the feature schema they were fit on, and the optional decision
//! threshold. It is loaded once at startup and then shared read-only.

pub mod classifier;
pub mod reducer;
pub mod scaler;
pub mod schema;
pub mod threshold;

use log::{debug, info};
use serde::de::DeserializeOwned;
#[cfg(test)]
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigurationError;

pub use classifier::{Classifier, ClassifierArtifact};
pub use reducer::{PrincipalComponents, ReducerArtifact};
pub use scaler::{ScalerArtifact, StandardScaler};
pub use schema::FeatureSchema;
pub use threshold::{DecisionThreshold, ThresholdSource, DEFAULT_DECISION_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Reducer,
    Scaler,
    FeatureSchema,
    Threshold,
}

impl ArtifactKind {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Classifier => "classifier.json",
            ArtifactKind::Reducer => "reducer.json",
            ArtifactKind::Scaler => "scaler.json",
            ArtifactKind::FeatureSchema => "feature_names.json",
            ArtifactKind::Threshold => "threshold.json",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Reducer => "reducer",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::FeatureSchema => "feature schema",
            ArtifactKind::Threshold => "decision threshold",
        };
        write!(f, "{}", name)
    }
}

/// Where each artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    pub classifier: PathBuf,
    pub reducer: PathBuf,
    pub scaler: PathBuf,
    pub feature_names: PathBuf,
    pub threshold: PathBuf,
}

impl BundlePaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            classifier: dir.join(ArtifactKind::Classifier.default_file_name()),
            reducer: dir.join(ArtifactKind::Reducer.default_file_name()),
            scaler: dir.join(ArtifactKind::Scaler.default_file_name()),
            feature_names: dir.join(ArtifactKind::FeatureSchema.default_file_name()),
            threshold: dir.join(ArtifactKind::Threshold.default_file_name()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub schema: FeatureSchema,
    pub scaler: StandardScaler,
    pub reducer: PrincipalComponents,
    pub classifier: Classifier,
    pub threshold: DecisionThreshold,
    /// Hex SHA-256 over the artifacts that make up this bundle.
    pub fingerprint: String,
}

impl ModelBundle {
    /// Loads every artifact and checks that their shapes line up.
    pub fn load(paths: &BundlePaths) -> Result<Self, ConfigurationError> {
        info!("Loading model bundle");
        let (classifier, classifier_bytes) =
            read_artifact::<ClassifierArtifact>(ArtifactKind::Classifier, &paths.classifier)?;
        let (reducer, reducer_bytes) =
            read_artifact::<ReducerArtifact>(ArtifactKind::Reducer, &paths.reducer)?;
        let (scaler, scaler_bytes) =
            read_artifact::<ScalerArtifact>(ArtifactKind::Scaler, &paths.scaler)?;
        let (feature_names, schema_bytes) =
            read_artifact::<Vec<String>>(ArtifactKind::FeatureSchema, &paths.feature_names)?;
        let (threshold, threshold_bytes) = DecisionThreshold::load(&paths.threshold);

        let mut hasher = Sha256::new();
        for bytes in [&classifier_bytes, &reducer_bytes, &scaler_bytes, &schema_bytes] {
            hasher.update(bytes);
        }
        if let Some(bytes) = &threshold_bytes {
            hasher.update(bytes);
        }
        let fingerprint = hex::encode(hasher.finalize());

        let schema = FeatureSchema::new(feature_names).map_err(|e| {
            ConfigurationError::CorruptArtifact {
                kind: ArtifactKind::FeatureSchema,
                path: paths.feature_names.clone(),
                detail: format!("{:#}", e),
            }
        })?;
        let scaler = StandardScaler::from_artifact(scaler).map_err(|e| {
            ConfigurationError::CorruptArtifact {
                kind: ArtifactKind::Scaler,
                path: paths.scaler.clone(),
                detail: format!("{:#}", e),
            }
        })?;
        let reducer = PrincipalComponents::from_artifact(reducer).map_err(|e| {
            ConfigurationError::CorruptArtifact {
                kind: ArtifactKind::Reducer,
                path: paths.reducer.clone(),
                detail: format!("{:#}", e),
            }
        })?;
        let classifier = Classifier::from_artifact(classifier).map_err(|e| {
            ConfigurationError::CorruptArtifact {
                kind: ArtifactKind::Classifier,
                path: paths.classifier.clone(),
                detail: format!("{:#}", e),
            }
        })?;

        let bundle = Self::assemble(schema, scaler, reducer, classifier, threshold, fingerprint)?;
        info!(
            "Model bundle ready: {} features -> {} components -> {} (threshold {:.3}, fingerprint {})",
            bundle.schema.len(),
            bundle.reducer.n_components(),
            bundle.classifier.kind(),
            bundle.threshold.value,
            bundle.fingerprint
        );
        Ok(bundle)
    }

    /// Builds a bundle from in-memory artifacts. The fingerprint is taken
    /// over their JSON serialization, threshold included when one was given.
    #[cfg(test)]
    pub(crate) fn from_artifacts(
        feature_names: Vec<String>,
        scaler: ScalerArtifact,
        reducer: ReducerArtifact,
        classifier: ClassifierArtifact,
        threshold: DecisionThreshold,
    ) -> Result<Self, ConfigurationError> {
        let mut hasher = Sha256::new();
        hasher.update(json_bytes(&classifier)?);
        hasher.update(json_bytes(&reducer)?);
        hasher.update(json_bytes(&scaler)?);
        hasher.update(json_bytes(&feature_names)?);
        if threshold.source == ThresholdSource::Artifact {
            hasher.update(json_bytes(&threshold::ThresholdArtifact::Bare(threshold.value))?);
        }
        let fingerprint = hex::encode(hasher.finalize());

        let schema = FeatureSchema::new(feature_names)
            .map_err(|e| ConfigurationError::ShapeMismatch(format!("{:#}", e)))?;
        let scaler = StandardScaler::from_artifact(scaler)
            .map_err(|e| ConfigurationError::ShapeMismatch(format!("{:#}", e)))?;
        let reducer = PrincipalComponents::from_artifact(reducer)
            .map_err(|e| ConfigurationError::ShapeMismatch(format!("{:#}", e)))?;
        let classifier = Classifier::from_artifact(classifier)
            .map_err(|e| ConfigurationError::ShapeMismatch(format!("{:#}", e)))?;

        Self::assemble(schema, scaler, reducer, classifier, threshold, fingerprint)
    }

    fn assemble(
        schema: FeatureSchema,
        scaler: StandardScaler,
        reducer: PrincipalComponents,
        classifier: Classifier,
        threshold: DecisionThreshold,
        fingerprint: String,
    ) -> Result<Self, ConfigurationError> {
        if scaler.n_features() != schema.len() {
            return Err(ConfigurationError::ShapeMismatch(format!(
                "scaler was fit on {} columns but the feature schema lists {}",
                scaler.n_features(),
                schema.len()
            )));
        }
        if reducer.n_features() != schema.len() {
            return Err(ConfigurationError::ShapeMismatch(format!(
                "reducer expects {} columns but the feature schema lists {}",
                reducer.n_features(),
                schema.len()
            )));
        }
        if classifier.n_features() != reducer.n_components() {
            return Err(ConfigurationError::ShapeMismatch(format!(
                "classifier expects {} inputs but the reducer produces {} components",
                classifier.n_features(),
                reducer.n_components()
            )));
        }

        Ok(Self {
            schema,
            scaler,
            reducer,
            classifier,
            threshold,
            fingerprint,
        })
    }

    /// Human-readable description, used by the inspection tool.
    pub fn summary(&self) -> String {
        let mut output = String::from("Model Bundle Summary:\n");
        output.push_str(&format!("  Fingerprint: {}\n", self.fingerprint));
        output.push_str(&format!("  Classifier: {}\n", self.classifier.kind()));
        output.push_str(&format!(
            "  Pipeline: {} features -> {} components -> 2 classes\n",
            self.schema.len(),
            self.reducer.n_components()
        ));
        let source = match self.threshold.source {
            ThresholdSource::Artifact => "artifact",
            ThresholdSource::DefaultMissing => "default, artifact missing",
            ThresholdSource::DefaultInvalid => "default, artifact invalid",
        };
        output.push_str(&format!(
            "  Decision threshold: {:.3} ({})\n",
            self.threshold.value, source
        ));
        output.push_str("\n  Idx | Feature\n");
        output.push_str("  ----|--------\n");
        for (idx, name) in self.schema.names().iter().enumerate() {
            output.push_str(&format!("  {:>3} | {}\n", idx, name));
        }
        output
    }
}

fn read_artifact<T: DeserializeOwned>(
    kind: ArtifactKind,
    path: &Path,
) -> Result<(T, Vec<u8>), ConfigurationError> {
    debug!("Reading {} artifact from {}", kind, path.display());
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigurationError::MissingArtifact {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            ConfigurationError::UnreadableArtifact {
                kind,
                path: path.to_path_buf(),
                detail: e.to_string(),
            }
        }
    })?;
    let value = serde_json::from_slice(&bytes).map_err(|e| ConfigurationError::CorruptArtifact {
        kind,
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok((value, bytes))
}

#[cfg(test)]
fn json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, ConfigurationError> {
    serde_json::to_vec(value).map_err(|e| ConfigurationError::ShapeMismatch(e.to_string()))
}
