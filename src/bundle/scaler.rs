// src/bundle/scaler.rs
use anyhow::{ensure, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// On-disk form of a fitted standard scaler.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// `(x - mean) / scale`, column-wise.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self> {
        ensure!(!artifact.mean.is_empty(), "Scaler has no columns");
        ensure!(
            artifact.mean.len() == artifact.scale.len(),
            "Scaler mean has {} columns but scale has {}",
            artifact.mean.len(),
            artifact.scale.len()
        );
        ensure!(
            artifact
                .mean
                .iter()
                .chain(artifact.scale.iter())
                .all(|v| v.is_finite()),
            "Scaler contains non-finite parameters"
        );

        // A zero scale marks a constant column; it is left unscaled.
        let scale = artifact
            .scale
            .iter()
            .map(|s| if *s == 0.0 { 1.0 } else { *s })
            .collect::<Array1<f64>>();

        Ok(Self {
            mean: Array1::from(artifact.mean),
            scale,
        })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        ensure!(
            x.len() == self.n_features(),
            "Scaler expects {} values, got {}",
            self.n_features(),
            x.len()
        );
        Ok((x - &self.mean) / &self.scale)
    }
}
