//! Churn Query Service
//!
//! Orchestration and serving boundary over the churn inference core:
//! - `intent`: Pure free-text query parsing
//! - `source`: Data source collaborators (local snapshot, remote HTTP)
//! - `orchestrator`: intent -> fetch -> encode -> infer -> aggregate
//! - `server`: axum HTTP boundary with caller-safe error conversion
//! - `config`: TOML + environment configuration
//! - `errors`: Service-level failure taxonomy

pub mod config;
pub mod errors;
pub mod intent;
pub mod orchestrator;
pub mod server;
pub mod source;

pub use config::{ConfigError, DataSourceConfig, ServiceConfig};
pub use errors::{PipelineError, UpstreamFetchError};
pub use intent::{parse_intent, QueryIntent, RecordSelection, SegmentFilter};
pub use orchestrator::Orchestrator;
pub use server::{router, AppState};
pub use source::{DataSource, JsonFileSource};

#[cfg(feature = "remote_source")]
pub use source::HttpDataSource;

/// Service version string for health reporting
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
