//! HTTP serving boundary
//!
//! Thin axum layer over the orchestrator exposing the two JSON contracts:
//! the inbound prediction contract (`POST /predict_churn`) and the
//! caller-facing query contract (`POST /query`), plus a health probe.
//! Pipeline failures are logged in full and converted into caller-safe
//! structured bodies; raw error chains never leave the process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use churn_core::record::CustomerRecord;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::errors::PipelineError;
use crate::orchestrator::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub artifact_version: String,
    pub artifact_hash: String,
    pub start_time: Instant,
    pub req_count: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let artifact = orchestrator.engine().artifact();
        let artifact_version = artifact.metadata.version.clone();
        let artifact_hash = artifact
            .content_hash()
            .unwrap_or_else(|_| "unavailable".to_string());
        Self {
            orchestrator,
            artifact_version,
            artifact_hash,
            start_time: Instant::now(),
            req_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn record_request(&self) -> usize {
        self.req_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub summary: String,
    #[serde(rename = "churnRate")]
    pub churn_rate: f64,
    #[serde(rename = "customerCount")]
    pub customer_count: usize,
}

#[derive(Debug, Serialize)]
pub struct PredictChurnResponse {
    pub churn_probabilities: Vec<f64>,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict_churn", post(predict_churn))
        .route("/query", post(handle_query))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Inbound prediction contract: an array of customer records in, one
/// probability per record in input order out.
async fn predict_churn(
    State(state): State<AppState>,
    Json(records): Json<Vec<CustomerRecord>>,
) -> Result<Json<PredictChurnResponse>, ApiError> {
    state.record_request();
    let churn_probabilities = state.orchestrator.predict_records(&records)?;
    Ok(Json(PredictChurnResponse {
        churn_probabilities,
    }))
}

/// Caller-facing query contract: free text in, churn summary out.
async fn handle_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    state.record_request();
    let summary = state.orchestrator.handle_query(&request.query).await?;
    Ok(Json(QueryResponse {
        summary: summary.summary,
        churn_rate: summary.churn_rate,
        customer_count: summary.customer_count,
    }))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "artifact_version": state.artifact_version,
        "artifact_hash": state.artifact_hash,
        "uptime_seconds": state.uptime_seconds(),
        "requests": state.req_count.load(Ordering::Relaxed),
    }))
}

/// Caller-safe wrapper around pipeline failures.
struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PipelineError::Encoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::EmptyDataset(_) => StatusCode::NOT_FOUND,
            PipelineError::UpstreamFetch(_) => StatusCode::BAD_GATEWAY,
            PipelineError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Operators get the full error; callers get the safe form.
        match &self.0 {
            PipelineError::Inference(_) | PipelineError::UpstreamFetch(_) => {
                error!(error = %self.0, "pipeline failure")
            }
            _ => warn!(error = %self.0, "request rejected"),
        }

        let body = serde_json::json!({
            "error": self.0.caller_code(),
            "message": self.0.caller_message(),
        });
        (status, Json(body)).into_response()
    }
}
