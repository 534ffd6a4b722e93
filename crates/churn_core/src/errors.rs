//! Error types for the churn inference core

use thiserror::Error;

use crate::serde_canon::CanonicalError;

/// Errors raised while encoding a customer record into a feature vector.
///
/// Every variant names the offending wire field so callers can report
/// exactly which column of the source data is malformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    /// A categorical value never seen at training time, with no unknown
    /// bucket declared in the schema for this field.
    #[error("unknown value {value:?} for field {field}")]
    UnknownCategory { field: String, value: String },

    /// The schema references a field the record does not carry.
    #[error("record is missing field {field}")]
    MissingField { field: String },

    /// A numeric field that is NaN or infinite after deserialization.
    #[error("malformed numeric value {value} for field {field}")]
    MalformedNumeric { field: String, value: f64 },
}

impl EncodingError {
    /// The wire name of the field that failed to encode.
    pub fn field(&self) -> &str {
        match self {
            EncodingError::UnknownCategory { field, .. }
            | EncodingError::MissingField { field }
            | EncodingError::MalformedNumeric { field, .. } => field,
        }
    }
}

/// Errors raised by the inference engine and the model artifact loader.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Feature vector length does not match the model input dimension.
    /// Truncated or padded vectors are rejected, never guessed at.
    #[error("feature vector has {actual} dimensions, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Structurally invalid ensemble or schema inside the artifact.
    #[error("corrupt model artifact: {0}")]
    CorruptArtifact(String),

    /// Artifact content hash does not match the stored seal.
    #[error("artifact hash mismatch: expected {expected}, computed {actual}")]
    HashMismatch { expected: String, actual: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Canonical serialization error
    #[error("canonical serialization error: {0}")]
    Canonical(#[from] CanonicalError),
}

/// A batch with zero records reached a stage that requires at least one.
///
/// Reported instead of ever dividing by zero in the aggregator; the
/// orchestration boundary turns this into a caller-safe message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no customer data available for the requested window")]
pub struct EmptyDatasetError;
