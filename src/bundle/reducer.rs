// src/bundle/reducer.rs
use anyhow::{ensure, Context, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// On-disk form of a fitted principal component projection.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReducerArtifact {
    pub mean: Vec<f64>,
    /// One row per component, each as wide as `mean`.
    pub components: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explained_variance: Option<Vec<f64>>,
    #[serde(default)]
    pub whiten: bool,
}

#[derive(Debug, Clone)]
pub struct PrincipalComponents {
    mean: Array1<f64>,
    components: Array2<f64>,
    /// `sqrt(explained_variance)` when whitening.
    whitening: Option<Array1<f64>>,
}

impl PrincipalComponents {
    pub fn from_artifact(artifact: ReducerArtifact) -> Result<Self> {
        let n_features = artifact.mean.len();
        let n_components = artifact.components.len();
        ensure!(n_features > 0, "Reducer mean is empty");
        ensure!(n_components > 0, "Reducer has no components");

        for (idx, row) in artifact.components.iter().enumerate() {
            ensure!(
                row.len() == n_features,
                "Reducer component {} has {} values, expected {}",
                idx,
                row.len(),
                n_features
            );
        }
        ensure!(
            artifact
                .mean
                .iter()
                .chain(artifact.components.iter().flatten())
                .all(|v| v.is_finite()),
            "Reducer contains non-finite parameters"
        );

        let whitening = if artifact.whiten {
            let variance = artifact
                .explained_variance
                .as_ref()
                .context("Whitening reducer is missing explained_variance")?;
            ensure!(
                variance.len() == n_components,
                "Reducer has {} components but {} explained variances",
                n_components,
                variance.len()
            );
            ensure!(
                variance.iter().all(|v| v.is_finite() && *v > 0.0),
                "Explained variance must be positive for whitening"
            );
            Some(variance.iter().map(|v| v.sqrt()).collect::<Array1<f64>>())
        } else {
            None
        };

        let flat: Vec<f64> = artifact.components.into_iter().flatten().collect();
        let components = Array2::from_shape_vec((n_components, n_features), flat)
            .context("Failed to shape reducer components")?;

        Ok(Self {
            mean: Array1::from(artifact.mean),
            components,
            whitening,
        })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    pub fn transform(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        ensure!(
            x.len() == self.n_features(),
            "Reducer expects {} values, got {}",
            self.n_features(),
            x.len()
        );
        let centered = x - &self.mean;
        let projected = self.components.dot(&centered);
        Ok(match &self.whitening {
            Some(std_dev) => projected / std_dev,
            None => projected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn artifact() -> ReducerArtifact {
        ReducerArtifact {
            mean: vec![1.0, 1.0, 1.0],
            components: vec![vec![1.0, 0.0, 0.0], vec![0.0, 0.5, 0.5]],
            explained_variance: Some(vec![4.0, 1.0]),
            whiten: false,
        }
    }

    #[test]
    fn test_projects_centered_input() {
        let pca = PrincipalComponents::from_artifact(artifact()).unwrap();
        assert_eq!(pca.n_features(), 3);
        assert_eq!(pca.n_components(), 2);

        let out = pca.transform(&array![3.0, 5.0, 1.0]).unwrap();
        assert_eq!(out, array![2.0, 2.0]);
    }

    #[test]
    fn test_whitening_divides_by_component_std() {
        let pca = PrincipalComponents::from_artifact(ReducerArtifact {
            whiten: true,
            ..artifact()
        })
        .unwrap();
        let out = pca.transform(&array![3.0, 5.0, 1.0]).unwrap();
        assert_eq!(out, array![1.0, 2.0]);
    }

    #[test]
    fn test_rejects_ragged_components() {
        let err = PrincipalComponents::from_artifact(ReducerArtifact {
            components: vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0]],
            ..artifact()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Reducer component 1 has 2 values, expected 3");
    }

    #[test]
    fn test_whitening_requires_variance() {
        assert!(PrincipalComponents::from_artifact(ReducerArtifact {
            whiten: true,
            explained_variance: None,
            ..artifact()
        })
        .is_err());
    }
}
