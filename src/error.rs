// src/error.rs
use std::fmt;
use std::path::PathBuf;

use crate::bundle::ArtifactKind;

/// The model bundle cannot be used. Raised once at load time and shown on
/// every page for the rest of the process lifetime.
#[derive(Debug)]
pub enum ConfigurationError {
    MissingArtifact {
        kind: ArtifactKind,
        path: PathBuf,
    },
    UnreadableArtifact {
        kind: ArtifactKind,
        path: PathBuf,
        detail: String,
    },
    CorruptArtifact {
        kind: ArtifactKind,
        path: PathBuf,
        detail: String,
    },
    ShapeMismatch(String),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MissingArtifact { kind, path } => {
                write!(f, "Required {} artifact not found at {}", kind, path.display())
            }
            ConfigurationError::UnreadableArtifact { kind, path, detail } => write!(
                f,
                "Could not read {} artifact at {}: {}",
                kind,
                path.display(),
                detail
            ),
            ConfigurationError::CorruptArtifact { kind, path, detail } => write!(
                f,
                "Failed to deserialize {} artifact at {}: {}",
                kind,
                path.display(),
                detail
            ),
            ConfigurationError::ShapeMismatch(detail) => {
                write!(f, "Model artifacts are inconsistent: {}", detail)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Scaling,
    Reduction,
    Classification,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Scaling => write!(f, "scaling"),
            PipelineStage::Reduction => write!(f, "dimensionality reduction"),
            PipelineStage::Classification => write!(f, "classification"),
        }
    }
}

/// Failure of a single prediction. The request fails, the server keeps going.
#[derive(Debug)]
pub struct InferenceError {
    pub stage: PipelineStage,
    source: anyhow::Error,
}

impl InferenceError {
    pub fn new(stage: PipelineStage, source: anyhow::Error) -> Self {
        Self { stage, source }
    }

    /// Full error chain, one cause per line.
    pub fn diagnostic(&self) -> String {
        format!("{} stage failed: {:?}", self.stage, self.source)
    }
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed: {:#}", self.stage, self.source)
    }
}

impl std::error::Error for InferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}
