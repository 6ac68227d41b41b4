// src/bundle/schema.rs
use anyhow::{bail, Result};
use std::collections::HashMap;

/// Ordered column names the pipeline was fit on.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            bail!("Feature schema is empty");
        }

        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                bail!("Feature schema column {} has an empty name", idx);
            }
            if let Some(previous) = positions.insert(name.clone(), idx) {
                bail!(
                    "Feature schema column '{}' appears twice (positions {} and {})",
                    name,
                    previous,
                    idx
                );
            }
        }

        Ok(Self { names, positions })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_positions_follow_declared_order() {
        let schema = FeatureSchema::new(names(&["age", "insulin", "A1Cresult"])).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.position("age"), Some(0));
        assert_eq!(schema.position("A1Cresult"), Some(2));
        assert_eq!(schema.position("gender"), None);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_columns() {
        assert!(FeatureSchema::new(Vec::new()).is_err());
        assert!(FeatureSchema::new(names(&["age", " "])).is_err());
        let err = FeatureSchema::new(names(&["age", "insulin", "age"])).unwrap_err();
        assert!(err.to_string().contains("appears twice"));
    }
}
