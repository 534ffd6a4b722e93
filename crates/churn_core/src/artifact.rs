//! Versioned model artifact: ensemble + encoding schema as one unit
//!
//! The trained ensemble and the encoding schema that produced its training
//! matrix ship in a single JSON document, sealed with a blake3 content
//! hash. Replacing the model means replacing the whole artifact; the
//! schema is never edited independently, which is what rules out silent
//! train/serve skew. Loading verifies the seal and the structure before
//! any inference is served, and a failed load is fatal to the process.

use crate::errors::InferenceError;
use crate::gbdt::Model;
use crate::schema::EncodingSchema;
use crate::serde_canon::hash_canonical_hex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Artifact identification and the decision threshold fixed at training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactMetadata {
    /// Semantic artifact version, e.g. "telco-churn/1".
    pub version: String,
    /// When the ensemble was trained.
    pub trained_at: DateTime<Utc>,
    /// Probability cutoff above which a record counts as predicted churn.
    pub decision_threshold: f64,
}

/// The loaded model artifact: metadata, encoding schema, and ensemble.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChurnModelArtifact {
    pub metadata: ArtifactMetadata,
    pub schema: EncodingSchema,
    pub model: Model,
}

/// On-disk envelope: the artifact plus its blake3 content hash.
#[derive(Debug, Serialize, Deserialize)]
struct SealedArtifact {
    artifact: ChurnModelArtifact,
    content_hash: String,
}

impl ChurnModelArtifact {
    pub fn new(metadata: ArtifactMetadata, schema: EncodingSchema, model: Model) -> Self {
        Self {
            metadata,
            schema,
            model,
        }
    }

    /// Blake3 hash of the canonical JSON representation.
    pub fn content_hash(&self) -> Result<String, InferenceError> {
        Ok(hash_canonical_hex(self)?)
    }

    /// Validate the artifact as one unit: ensemble structure, schema
    /// structure, and their agreement on the feature dimension.
    pub fn validate(&self) -> Result<(), InferenceError> {
        self.model
            .validate()
            .map_err(|e| InferenceError::CorruptArtifact(e.to_string()))?;

        self.schema
            .validate()
            .map_err(InferenceError::CorruptArtifact)?;

        let schema_len = self.schema.feature_len();
        if self.model.n_features != schema_len {
            return Err(InferenceError::CorruptArtifact(format!(
                "model expects {} features, schema encodes {}",
                self.model.n_features, schema_len
            )));
        }

        let threshold = self.metadata.decision_threshold;
        if !(0.0..=1.0).contains(&threshold) || !threshold.is_finite() {
            return Err(InferenceError::CorruptArtifact(format!(
                "decision threshold {threshold} outside [0, 1]"
            )));
        }

        // Smoke inference: a zero vector must yield a finite probability.
        let probe = vec![0.0; self.model.n_features];
        let probability = self.model.predict_probability(&probe);
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::CorruptArtifact(format!(
                "smoke inference produced {probability}"
            )));
        }

        Ok(())
    }

    /// Save the artifact with its content seal.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), InferenceError> {
        let sealed = SealedArtifact {
            content_hash: self.content_hash()?,
            artifact: self.clone(),
        };
        let json = serde_json::to_string_pretty(&sealed)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load an artifact, verifying the content seal and the structure.
    ///
    /// Everything the inference path relies on is checked here, once, at
    /// process start; serving never begins against an unverified artifact.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, InferenceError> {
        let json = fs::read_to_string(path.as_ref())?;
        let sealed: SealedArtifact = serde_json::from_str(&json)?;

        let computed = sealed.artifact.content_hash()?;
        if computed != sealed.content_hash {
            return Err(InferenceError::HashMismatch {
                expected: sealed.content_hash,
                actual: computed,
            });
        }

        sealed.artifact.validate()?;

        info!(
            version = %sealed.artifact.metadata.version,
            trees = sealed.artifact.model.num_trees(),
            features = sealed.artifact.model.n_features,
            hash = %sealed.content_hash,
            "model artifact loaded"
        );

        Ok(sealed.artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbdt::{Node, Tree};
    use chrono::TimeZone;
    use tempfile::NamedTempFile;

    fn test_metadata() -> ArtifactMetadata {
        ArtifactMetadata {
            version: "telco-churn/1".to_string(),
            trained_at: Utc.with_ymd_and_hms(2025, 11, 4, 9, 30, 0).unwrap(),
            decision_threshold: 0.5,
        }
    }

    fn test_artifact() -> ChurnModelArtifact {
        let schema = EncodingSchema::telco();
        let n = schema.feature_len();

        // Split on tenure (column 3): short tenure is churn-leaning.
        let tree = Tree::new(vec![
            Node::internal(0, 3, 12.0, 1, 2),
            Node::leaf(1, 1.2),
            Node::leaf(2, -1.0),
        ]);
        let model = Model::new(n, vec![tree], 0.0);

        ChurnModelArtifact::new(test_metadata(), schema, model)
    }

    #[test]
    fn valid_artifact_passes_validation() {
        assert!(test_artifact().validate().is_ok());
    }

    #[test]
    fn dimension_disagreement_is_corrupt() {
        let mut artifact = test_artifact();
        artifact.model.n_features = 7;
        // Tree splits on column 3, still valid for 7 features; the
        // schema/model disagreement must be caught regardless.
        assert!(matches!(
            artifact.validate(),
            Err(InferenceError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn out_of_range_threshold_is_corrupt() {
        let mut artifact = test_artifact();
        artifact.metadata.decision_threshold = 1.5;
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn save_load_round_trip_preserves_hash() {
        let artifact = test_artifact();
        let file = NamedTempFile::new().unwrap();

        artifact.save_json(file.path()).unwrap();
        let loaded = ChurnModelArtifact::load_json(file.path()).unwrap();

        assert_eq!(artifact, loaded);
        assert_eq!(
            artifact.content_hash().unwrap(),
            loaded.content_hash().unwrap()
        );
    }

    #[test]
    fn tampered_artifact_fails_to_load() {
        let artifact = test_artifact();
        let file = NamedTempFile::new().unwrap();
        artifact.save_json(file.path()).unwrap();

        // Flip the stored threshold without resealing.
        let json = std::fs::read_to_string(file.path()).unwrap();
        let tampered = json.replace("\"decision_threshold\": 0.5", "\"decision_threshold\": 0.1");
        assert_ne!(json, tampered);
        std::fs::write(file.path(), tampered).unwrap();

        assert!(matches!(
            ChurnModelArtifact::load_json(file.path()),
            Err(InferenceError::HashMismatch { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = ChurnModelArtifact::load_json("/nonexistent/churn.artifact.json");
        assert!(matches!(result, Err(InferenceError::Io(_))));
    }
}
