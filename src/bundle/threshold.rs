// src/bundle/threshold.rs
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Either a bare number or `{"threshold": number}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(untagged)]
pub enum ThresholdArtifact {
    Bare(f64),
    Wrapped { threshold: f64 },
}

impl ThresholdArtifact {
    pub fn value(&self) -> f64 {
        match self {
            ThresholdArtifact::Bare(v) => *v,
            ThresholdArtifact::Wrapped { threshold } => *threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    Artifact,
    DefaultMissing,
    DefaultInvalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionThreshold {
    pub value: f64,
    pub source: ThresholdSource,
}

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self {
            value: DEFAULT_DECISION_THRESHOLD,
            source: ThresholdSource::DefaultMissing,
        }
    }
}

impl DecisionThreshold {
    pub fn from_value(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self {
                value,
                source: ThresholdSource::Artifact,
            })
        } else {
            None
        }
    }

    /// Never fails: anything wrong with the optional artifact falls back to
    /// the default. Returns the raw bytes when the artifact was used.
    pub fn load(path: &Path) -> (Self, Option<Vec<u8>>) {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "No decision threshold at {}, using default {}",
                    path.display(),
                    DEFAULT_DECISION_THRESHOLD
                );
                return (Self::default(), None);
            }
            Err(e) => {
                warn!(
                    "Could not read decision threshold at {}: {}. Using default {}",
                    path.display(),
                    e,
                    DEFAULT_DECISION_THRESHOLD
                );
                return (Self::invalid(), None);
            }
        };

        let parsed = serde_json::from_slice::<ThresholdArtifact>(&bytes)
            .ok()
            .and_then(|artifact| Self::from_value(artifact.value()));

        match parsed {
            Some(threshold) => (threshold, Some(bytes)),
            None => {
                warn!(
                    "Decision threshold at {} is not a number in [0, 1]. Using default {}",
                    path.display(),
                    DEFAULT_DECISION_THRESHOLD
                );
                (Self::invalid(), None)
            }
        }
    }

    fn invalid() -> Self {
        Self {
            value: DEFAULT_DECISION_THRESHOLD,
            source: ThresholdSource::DefaultInvalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let (threshold, bytes) = DecisionThreshold::load(&dir.path().join("threshold.json"));
        assert_eq!(threshold.value, 0.5);
        assert_eq!(threshold.source, ThresholdSource::DefaultMissing);
        assert!(bytes.is_none());
    }

    #[test]
    fn test_reads_bare_and_wrapped_values() {
        let dir = tempfile::tempdir().unwrap();
        let bare = dir.path().join("bare.json");
        fs::write(&bare, "0.35").unwrap();
        let wrapped = dir.path().join("wrapped.json");
        fs::write(&wrapped, r#"{"threshold": 0.42}"#).unwrap();

        let (t1, bytes) = DecisionThreshold::load(&bare);
        assert_eq!(t1.value, 0.35);
        assert_eq!(t1.source, ThresholdSource::Artifact);
        assert_eq!(bytes.unwrap(), b"0.35".to_vec());

        let (t2, _) = DecisionThreshold::load(&wrapped);
        assert_eq!(t2.value, 0.42);
    }

    #[test]
    fn test_corrupt_or_out_of_range_value_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "not json").unwrap();
        let too_big = dir.path().join("too_big.json");
        fs::write(&too_big, "1.5").unwrap();

        for path in [garbage, too_big] {
            let (threshold, bytes) = DecisionThreshold::load(&path);
            assert_eq!(threshold.value, 0.5);
            assert_eq!(threshold.source, ThresholdSource::DefaultInvalid);
            assert!(bytes.is_none());
        }
    }
}
