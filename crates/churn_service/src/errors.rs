//! Service-layer error types
//!
//! The core taxonomy (`EncodingError`, `InferenceError`,
//! `EmptyDatasetError`) is wrapped, never retried, and converted into
//! caller-safe messages at the HTTP boundary. Full detail is logged for
//! operators; raw error chains never reach the caller.

use churn_core::errors::{EmptyDatasetError, EncodingError, InferenceError};
use thiserror::Error;

/// The external data source failed to deliver records.
#[derive(Error, Debug)]
pub enum UpstreamFetchError {
    #[error("data source unreachable: {0}")]
    Transport(String),

    #[error("data source returned malformed records: {0}")]
    Decode(String),

    #[error("I/O error reading data source: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "remote_source")]
impl From<reqwest::Error> for UpstreamFetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamFetchError::Decode(err.to_string())
        } else {
            UpstreamFetchError::Transport(err.to_string())
        }
    }
}

/// Any failure of the fetch -> encode -> infer -> aggregate pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("{0}")]
    EmptyDataset(#[from] EmptyDatasetError),

    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[from] UpstreamFetchError),
}

impl PipelineError {
    /// Stable machine-readable code for the caller-facing error body.
    pub fn caller_code(&self) -> &'static str {
        match self {
            PipelineError::Encoding(_) => "encoding_error",
            PipelineError::Inference(_) => "inference_error",
            PipelineError::EmptyDataset(_) => "empty_dataset",
            PipelineError::UpstreamFetch(_) => "upstream_fetch_error",
        }
    }

    /// Caller-safe message. Encoding failures name the offending field and
    /// value (both caller-provided data); everything else stays generic.
    pub fn caller_message(&self) -> String {
        match self {
            PipelineError::Encoding(err) => err.to_string(),
            PipelineError::Inference(_) => {
                "the churn model could not score the requested records".to_string()
            }
            PipelineError::EmptyDataset(err) => err.to_string(),
            PipelineError::UpstreamFetch(_) => {
                "the customer data source is currently unreachable".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_message_names_the_field() {
        let err = PipelineError::from(EncodingError::UnknownCategory {
            field: "InternetService".to_string(),
            value: "Satellite".to_string(),
        });
        assert_eq!(err.caller_code(), "encoding_error");
        assert!(err.caller_message().contains("InternetService"));
    }

    #[test]
    fn empty_dataset_message_is_the_canonical_one() {
        let err = PipelineError::from(EmptyDatasetError);
        assert_eq!(err.caller_code(), "empty_dataset");
        assert_eq!(
            err.caller_message(),
            "no customer data available for the requested window"
        );
    }

    #[test]
    fn inference_detail_is_not_exposed() {
        let err = PipelineError::from(InferenceError::CorruptArtifact(
            "/etc/secret/path exploded".to_string(),
        ));
        assert!(!err.caller_message().contains("/etc"));
    }

    #[test]
    fn upstream_detail_is_not_exposed() {
        let err = PipelineError::from(UpstreamFetchError::Transport(
            "connection refused to 10.0.0.7:9443".to_string(),
        ));
        assert!(!err.caller_message().contains("10.0.0.7"));
    }
}
