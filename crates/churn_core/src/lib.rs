//! Churn Inference Core
//!
//! Deterministic customer-churn prediction: schema-driven feature
//! encoding, pretrained GBDT evaluation, and batch aggregation.
//!
//! Modules:
//! - `record`: Customer record wire types
//! - `schema`: Encoding schema paired with the trained ensemble
//! - `encoder`: Record to feature-vector encoding
//! - `gbdt`: Gradient Boosted Decision Tree evaluator
//! - `artifact`: Versioned model artifact (ensemble + schema as one unit)
//! - `engine`: Stateless inference engine over a loaded artifact
//! - `aggregate`: Churn rate, customer count, and summary derivation
//! - `errors`: Typed failure taxonomy

pub mod aggregate;
pub mod artifact;
pub mod encoder;
pub mod engine;
pub mod errors;
pub mod gbdt;
pub mod record;
pub mod schema;
pub mod serde_canon;

#[cfg(any(test, feature = "enable-tests"))]
pub mod fixtures;

pub use aggregate::{summarize, ChurnFactor, ChurnSummary};
pub use artifact::{ArtifactMetadata, ChurnModelArtifact};
pub use encoder::{encode_batch, encode_record, FeatureVector};
pub use engine::InferenceEngine;
pub use errors::{EmptyDatasetError, EncodingError, InferenceError};
pub use gbdt::{Model, Node, Tree};
pub use record::{CustomerRecord, PredictionResult};
pub use schema::{EncodingSchema, FieldEncoding, FieldKind, ScalerParams};

/// Crate version string for metadata and health reporting
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
