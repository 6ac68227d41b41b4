// src/bundle/classifier.rs
use anyhow::{bail, ensure, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// On-disk form of the binary classifier, tagged by `kind`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    RandomForest {
        n_features: usize,
        trees: Vec<TreeArtifact>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TreeArtifact {
    pub nodes: Vec<TreeNode>,
}

/// Node 0 is the root. Children always come after their parent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights (counts or fractions) at the leaf.
    Leaf { value: [f64; 2] },
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LogisticRegression {
    fn predict_positive(&self, z: &Array1<f64>) -> f64 {
        let logit = self.coefficients.dot(z) + self.intercept;
        1.0 / (1.0 + (-logit).exp())
    }
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(nodes: &[TreeNode], n_features: usize) -> Result<()> {
        ensure!(!nodes.is_empty(), "tree has no nodes");
        for (idx, node) in nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    ensure!(
                        *feature < n_features,
                        "node {} splits on feature {} but the classifier has {} inputs",
                        idx,
                        feature,
                        n_features
                    );
                    ensure!(threshold.is_finite(), "node {} has a non-finite threshold", idx);
                    for child in [left, right] {
                        ensure!(
                            *child > idx && *child < nodes.len(),
                            "node {} points to invalid child {}",
                            idx,
                            child
                        );
                    }
                }
                TreeNode::Leaf { value } => {
                    ensure!(
                        value.iter().all(|v| v.is_finite() && *v >= 0.0),
                        "leaf {} has negative or non-finite weights",
                        idx
                    );
                    ensure!(value[0] + value[1] > 0.0, "leaf {} has zero total weight", idx);
                }
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `z`.
    fn leaf_distribution(&self, z: &Array1<f64>) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if z[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    return [value[0] / total, value[1] / total];
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    fn predict_proba(&self, z: &Array1<f64>) -> [f64; 2] {
        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let dist = tree.leaf_distribution(z);
            sum[0] += dist[0];
            sum[1] += dist[1];
        }
        let n = self.trees.len() as f64;
        [sum[0] / n, sum[1] / n]
    }
}

#[derive(Debug, Clone)]
pub enum Classifier {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
}

impl Classifier {
    pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self> {
        match artifact {
            ClassifierArtifact::LogisticRegression {
                coefficients,
                intercept,
            } => {
                ensure!(!coefficients.is_empty(), "Logistic regression has no coefficients");
                ensure!(
                    intercept.is_finite() && coefficients.iter().all(|c| c.is_finite()),
                    "Logistic regression contains non-finite parameters"
                );
                Ok(Classifier::LogisticRegression(LogisticRegression {
                    coefficients: Array1::from(coefficients),
                    intercept,
                }))
            }
            ClassifierArtifact::RandomForest { n_features, trees } => {
                ensure!(n_features > 0, "Random forest declares zero inputs");
                if trees.is_empty() {
                    bail!("Random forest has no trees");
                }
                let mut validated = Vec::with_capacity(trees.len());
                for (idx, tree) in trees.into_iter().enumerate() {
                    DecisionTree::validate(&tree.nodes, n_features)
                        .map_err(|e| anyhow::anyhow!("Random forest tree {}: {}", idx, e))?;
                    validated.push(DecisionTree { nodes: tree.nodes });
                }
                Ok(Classifier::RandomForest(RandomForest {
                    n_features,
                    trees: validated,
                }))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::LogisticRegression(_) => "logistic_regression",
            Classifier::RandomForest(_) => "random_forest",
        }
    }

    /// Width of the input this classifier was fit on.
    pub fn n_features(&self) -> usize {
        match self {
            Classifier::LogisticRegression(model) => model.coefficients.len(),
            Classifier::RandomForest(model) => model.n_features,
        }
    }

    /// `[P(no readmission), P(readmission)]`.
    pub fn predict_proba(&self, z: &Array1<f64>) -> Result<[f64; 2]> {
        ensure!(
            z.len() == self.n_features(),
            "Classifier expects {} values, got {}",
            self.n_features(),
            z.len()
        );
        let proba = match self {
            Classifier::LogisticRegression(model) => {
                let positive = model.predict_positive(z);
                [1.0 - positive, positive]
            }
            Classifier::RandomForest(model) => model.predict_proba(z),
        };
        ensure!(
            proba.iter().all(|p| p.is_finite()),
            "Classifier produced non-finite probabilities {:?}",
            proba
        );
        Ok(proba)
    }

    /// Label the classifier itself would assign; ties go to class 0.
    pub fn predict(&self, z: &Array1<f64>) -> Result<u8> {
        Ok(label_from_proba(&self.predict_proba(z)?))
    }
}

pub fn label_from_proba(proba: &[f64; 2]) -> u8 {
    if proba[1] > proba[0] {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn stump(feature: usize, threshold: f64, left: [f64; 2], right: [f64; 2]) -> TreeArtifact {
        TreeArtifact {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: left },
                TreeNode::Leaf { value: right },
            ],
        }
    }

    #[test]
    fn test_logistic_regression_probabilities() {
        let model = Classifier::from_artifact(ClassifierArtifact::LogisticRegression {
            coefficients: vec![1.0, -1.0],
            intercept: 0.0,
        })
        .unwrap();

        let even = model.predict_proba(&array![2.0, 2.0]).unwrap();
        assert!((even[0] - 0.5).abs() < 1e-12);
        assert_eq!(model.predict(&array![2.0, 2.0]).unwrap(), 0);

        let positive = model.predict_proba(&array![3.0, 0.0]).unwrap();
        assert!(positive[1] > 0.95);
        assert!((positive[0] + positive[1] - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&array![3.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_forest_averages_normalized_leaves() {
        let model = Classifier::from_artifact(ClassifierArtifact::RandomForest {
            n_features: 2,
            trees: vec![
                stump(0, 0.0, [9.0, 1.0], [2.0, 8.0]),
                stump(1, 1.0, [1.0, 1.0], [0.0, 4.0]),
            ],
        })
        .unwrap();
        assert_eq!(model.kind(), "random_forest");

        // tree 0 -> right leaf (0.2, 0.8), tree 1 -> left leaf (0.5, 0.5)
        let proba = model.predict_proba(&array![0.5, 1.0]).unwrap();
        assert!((proba[0] - 0.35).abs() < 1e-12);
        assert!((proba[1] - 0.65).abs() < 1e-12);
        assert_eq!(model.predict(&array![0.5, 1.0]).unwrap(), 1);
    }

    #[test]
    fn test_forest_rejects_bad_structure() {
        let backwards = TreeArtifact {
            nodes: vec![
                TreeNode::Leaf { value: [1.0, 0.0] },
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 0,
                },
            ],
        };
        assert!(Classifier::from_artifact(ClassifierArtifact::RandomForest {
            n_features: 1,
            trees: vec![backwards],
        })
        .is_err());

        let err = Classifier::from_artifact(ClassifierArtifact::RandomForest {
            n_features: 1,
            trees: vec![stump(3, 0.0, [1.0, 0.0], [0.0, 1.0])],
        })
        .unwrap_err();
        assert!(err.to_string().contains("splits on feature 3"));
    }

    #[test]
    fn test_artifact_json_format() {
        let json = r#"{
            "kind": "random_forest",
            "n_features": 1,
            "trees": [{"nodes": [
                {"feature": 0, "threshold": 0.5, "left": 1, "right": 2},
                {"value": [3, 1]},
                {"value": [1, 3]}
            ]}]
        }"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        let model = Classifier::from_artifact(artifact).unwrap();
        assert_eq!(model.n_features(), 1);
        assert_eq!(model.predict_proba(&array![0.0]).unwrap(), [0.75, 0.25]);
    }

    #[test]
    fn test_rejects_wrong_input_width() {
        let model = Classifier::from_artifact(ClassifierArtifact::LogisticRegression {
            coefficients: vec![1.0, 1.0, 1.0],
            intercept: 0.0,
        })
        .unwrap();
        assert!(model.predict_proba(&array![1.0]).is_err());
    }
}
