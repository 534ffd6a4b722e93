//! GBDT model with deterministic churn inference
//!
//! A pretrained, immutable ensemble of decision trees combined additively
//! in margin space. `binary:logistic` training maps the accumulated margin
//! through a sigmoid to produce the churn probability. Models carry a
//! canonical-JSON blake3 hash for artifact verification.

use super::tree::Tree;
use crate::serde_canon::{hash_canonical_hex, to_canonical_json, CanonicalError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// GBDT model errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Canonical serialization error: {0}")]
    CanonicalError(#[from] CanonicalError),
}

/// Boosted ensemble over a fixed feature dimension
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    /// Model format version (always 1 for now)
    pub version: i32,

    /// Number of input features the ensemble was trained on
    pub n_features: usize,

    /// Margin-space bias added before the sigmoid
    pub base_score: f64,

    /// Decision trees in the ensemble
    pub trees: Vec<Tree>,
}

impl Model {
    /// Create a new GBDT model
    pub fn new(n_features: usize, trees: Vec<Tree>, base_score: f64) -> Self {
        Self {
            version: 1,
            n_features,
            base_score,
            trees,
        }
    }

    /// Validate model structure
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.version != 1 {
            return Err(ModelError::ValidationFailed(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }

        if self.n_features == 0 {
            return Err(ModelError::ValidationFailed(
                "Model has no input features".to_string(),
            ));
        }

        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed(
                "Model has no trees".to_string(),
            ));
        }

        if !self.base_score.is_finite() {
            return Err(ModelError::ValidationFailed(
                "Model base score is not finite".to_string(),
            ));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| {
                ModelError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }

        Ok(())
    }

    /// Accumulated margin for a feature vector: `base_score + Σ leaf`.
    ///
    /// Assumes a vector of dimension `n_features`; the engine enforces
    /// this before calling.
    pub fn margin(&self, features: &[f64]) -> f64 {
        let mut sum = self.base_score;
        for tree in &self.trees {
            sum += tree.evaluate(features);
        }
        sum
    }

    /// Churn probability in [0, 1]: sigmoid of the accumulated margin.
    pub fn predict_probability(&self, features: &[f64]) -> f64 {
        sigmoid(self.margin(features))
    }

    /// Serialize model to canonical JSON (sorted keys, no whitespace)
    pub fn to_canonical_json(&self) -> Result<String, ModelError> {
        Ok(to_canonical_json(self)?)
    }

    /// Compute model hash as hex string
    pub fn hash_hex(&self) -> Result<String, ModelError> {
        Ok(hash_canonical_hex(self)?)
    }

    /// Save model to JSON file with canonical serialization
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let json = self.to_canonical_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load model from JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let json = fs::read_to_string(path)?;
        let model: Model = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }

    /// Get number of trees in the model
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Numerically stable logistic function
pub fn sigmoid(margin: f64) -> f64 {
    if margin >= 0.0 {
        1.0 / (1.0 + (-margin).exp())
    } else {
        let e = margin.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbdt::tree::Node;

    fn create_test_model() -> Model {
        // Two trees over [tenure, monthly_charges]
        let tree1 = Tree::new(vec![
            Node::internal(0, 0, 12.0, 1, 2),
            Node::leaf(1, 0.8),
            Node::leaf(2, -0.6),
        ]);

        let tree2 = Tree::new(vec![
            Node::internal(0, 1, 70.0, 1, 2),
            Node::leaf(1, -0.3),
            Node::leaf(2, 0.5),
        ]);

        Model::new(2, vec![tree1, tree2], 0.0)
    }

    #[test]
    fn test_model_creation() {
        let model = create_test_model();
        assert_eq!(model.version, 1);
        assert_eq!(model.n_features, 2);
        assert_eq!(model.num_trees(), 2);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_margin_accumulation() {
        let model = create_test_model();

        // tenure=10 (<=12 -> 0.8), charges=80 (>70 -> 0.5)
        let margin = model.margin(&[10.0, 80.0]);
        assert!((margin - 1.3).abs() < 1e-12);

        // tenure=40 (-0.6), charges=50 (-0.3)
        let margin = model.margin(&[40.0, 50.0]);
        assert!((margin + 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_probability_in_unit_interval() {
        let model = create_test_model();
        for features in [[10.0, 80.0], [40.0, 50.0], [0.0, 0.0], [100.0, 200.0]] {
            let p = model.predict_probability(&features);
            assert!((0.0..=1.0).contains(&p), "probability {p} out of range");
        }
    }

    #[test]
    fn test_probability_tracks_margin_sign() {
        let model = create_test_model();
        // Positive margin -> churn-leaning probability
        assert!(model.predict_probability(&[10.0, 80.0]) > 0.5);
        // Negative margin -> retain-leaning probability
        assert!(model.predict_probability(&[40.0, 50.0]) < 0.5);
    }

    #[test]
    fn test_deterministic_inference() {
        let model = create_test_model();
        let features = vec![10.0, 80.0];

        let p1 = model.predict_probability(&features);
        let p2 = model.predict_probability(&features);
        let p3 = model.predict_probability(&features);

        assert_eq!(p1, p2);
        assert_eq!(p2, p3);
    }

    #[test]
    fn test_base_score_shifts_margin() {
        let mut model = create_test_model();
        let before = model.margin(&[10.0, 80.0]);
        model.base_score = 0.25;
        let after = model.margin(&[10.0, 80.0]);
        assert!((after - before - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_symmetry() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-40.0) < 1e-6);
    }

    #[test]
    fn test_hash_deterministic() {
        let model1 = create_test_model();
        let model2 = create_test_model();

        let hash1 = model1.hash_hex().unwrap();
        let hash2 = model2.hash_hex().unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_hash_changes_with_model() {
        let model1 = create_test_model();
        let mut model2 = create_test_model();
        model2.base_score = 0.1;

        assert_ne!(model1.hash_hex().unwrap(), model2.hash_hex().unwrap());
    }

    #[test]
    fn test_save_load_json() {
        use tempfile::NamedTempFile;

        let model = create_test_model();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        model.save_json(path).unwrap();
        let loaded = Model::load_json(path).unwrap();

        assert_eq!(model, loaded);
        assert_eq!(model.hash_hex().unwrap(), loaded.hash_hex().unwrap());
        let features = vec![10.0, 80.0];
        assert_eq!(
            model.predict_probability(&features),
            loaded.predict_probability(&features)
        );
    }

    #[test]
    fn test_model_validation() {
        let valid = create_test_model();
        assert!(valid.validate().is_ok());

        let mut invalid = create_test_model();
        invalid.version = 999;
        assert!(invalid.validate().is_err());

        let mut invalid = create_test_model();
        invalid.trees.clear();
        assert!(invalid.validate().is_err());

        let mut invalid = create_test_model();
        invalid.n_features = 1; // tree2 splits on feature 1
        assert!(invalid.validate().is_err());
    }
}
