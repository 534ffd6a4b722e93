//! Inference engine over a shared, immutable model artifact
//!
//! The engine is constructed once at process start from a verified
//! artifact and injected wherever predictions are needed. It holds the
//! artifact behind an `Arc` and never mutates it, so a single engine is
//! safely shared by all concurrent requests with no locking; the only
//! serialization point in the system is the artifact load that precedes
//! engine construction.

use std::sync::Arc;

use tracing::debug;

use crate::artifact::ChurnModelArtifact;
use crate::encoder::FeatureVector;
use crate::errors::InferenceError;
use crate::schema::EncodingSchema;

/// Stateless churn predictor over a loaded artifact.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    artifact: Arc<ChurnModelArtifact>,
}

impl InferenceEngine {
    /// Build an engine over a verified artifact.
    pub fn new(artifact: Arc<ChurnModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ChurnModelArtifact {
        &self.artifact
    }

    /// The encoding schema paired with the loaded ensemble.
    pub fn schema(&self) -> &EncodingSchema {
        &self.artifact.schema
    }

    /// Decision threshold fixed at training time.
    pub fn threshold(&self) -> f64 {
        self.artifact.metadata.decision_threshold
    }

    /// Churn probability for one feature vector.
    ///
    /// Rejects any vector whose dimension differs from the model input
    /// dimension; truncated or padded vectors are never scored.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let expected = self.artifact.model.n_features;
        if features.len() != expected {
            return Err(InferenceError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }
        Ok(self.artifact.model.predict_probability(features))
    }

    /// Churn probabilities for a batch, preserving input order.
    pub fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
        let mut probabilities = Vec::with_capacity(batch.len());
        for features in batch {
            probabilities.push(self.predict(features)?);
        }
        debug!(batch = batch.len(), "scored batch");
        Ok(probabilities)
    }
}
