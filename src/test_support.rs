// src/test_support.rs
//! Small deterministic bundles for unit tests.
//!
//! The classifier ignores its inputs, so `P(readmission) = sigmoid(intercept)`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::bundle::{
    ClassifierArtifact, DecisionThreshold, ModelBundle, ReducerArtifact, ScalerArtifact,
};
use crate::features::columns;
use crate::inference::{InferenceEngine, InferenceSettings};

pub fn schema_names() -> Vec<String> {
    let mut names: Vec<String> = columns::ALL.iter().map(|c| c.to_string()).collect();
    names.push("number_outpatient".to_string());
    names.push("number_inpatient".to_string());
    names
}

pub fn scaler_artifact() -> ScalerArtifact {
    let width = schema_names().len();
    ScalerArtifact {
        mean: vec![0.0; width],
        scale: vec![1.0; width],
    }
}

pub fn reducer_artifact() -> ReducerArtifact {
    let width = schema_names().len();
    let mut first = vec![0.0; width];
    first[0] = 1.0;
    let mut second = vec![0.0; width];
    second[1] = 1.0;
    ReducerArtifact {
        mean: vec![0.0; width],
        components: vec![first, second],
        explained_variance: None,
        whiten: false,
    }
}

pub fn classifier_artifact(intercept: f64) -> ClassifierArtifact {
    ClassifierArtifact::LogisticRegression {
        coefficients: vec![0.0, 0.0],
        intercept,
    }
}

pub fn bundle(intercept: f64) -> ModelBundle {
    ModelBundle::from_artifacts(
        schema_names(),
        scaler_artifact(),
        reducer_artifact(),
        classifier_artifact(intercept),
        DecisionThreshold::default(),
    )
    .expect("test bundle is consistent")
}

pub fn engine(intercept: f64, settings: InferenceSettings) -> InferenceEngine {
    InferenceEngine::new(Arc::new(bundle(intercept)), settings)
}

/// A bundle whose first scale is so small that any nonzero age overflows
/// to infinity in the projection.
pub fn overflowing_engine() -> InferenceEngine {
    let mut scaler = scaler_artifact();
    scaler.scale[0] = 1e-310;
    let bundle = ModelBundle::from_artifacts(
        schema_names(),
        scaler,
        reducer_artifact(),
        classifier_artifact(0.0),
        DecisionThreshold::default(),
    )
    .expect("overflowing bundle is consistent");
    InferenceEngine::new(Arc::new(bundle), InferenceSettings::default())
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Writes the artifacts of `bundle(intercept)` into `dir`.
pub fn write_bundle(dir: &Path, intercept: f64, threshold_json: Option<&str>) {
    fs::write(
        dir.join("classifier.json"),
        serde_json::to_vec(&classifier_artifact(intercept)).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("reducer.json"),
        serde_json::to_vec(&reducer_artifact()).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("scaler.json"),
        serde_json::to_vec(&scaler_artifact()).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("feature_names.json"),
        serde_json::to_vec(&schema_names()).unwrap(),
    )
    .unwrap();
    if let Some(json) = threshold_json {
        fs::write(dir.join("threshold.json"), json).unwrap();
    }
}
