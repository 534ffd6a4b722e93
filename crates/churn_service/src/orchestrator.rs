//! Query orchestration: intent -> fetch -> encode -> infer -> aggregate
//!
//! Single-request, single-threaded execution per query. The orchestrator
//! composes the core stages in sequence and owns no pipeline logic of its
//! own; every stage failure propagates as a typed [`PipelineError`].

use std::sync::Arc;

use churn_core::aggregate::{summarize, ChurnSummary};
use churn_core::encoder::encode_batch;
use churn_core::engine::InferenceEngine;
use churn_core::errors::EmptyDatasetError;
use churn_core::record::{CustomerRecord, PredictionResult};
use tracing::{debug, info, instrument, warn};

use crate::errors::{PipelineError, UpstreamFetchError};
use crate::intent::{parse_intent, QueryIntent, RecordSelection};
use crate::source::DataSource;

/// Turns free-text queries into churn summaries against an injected
/// engine and data source.
pub struct Orchestrator {
    engine: InferenceEngine,
    source: Arc<dyn DataSource>,
    default_window: usize,
    max_window: usize,
}

impl Orchestrator {
    pub fn new(
        engine: InferenceEngine,
        source: Arc<dyn DataSource>,
        default_window: usize,
        max_window: usize,
    ) -> Self {
        Self {
            engine,
            source,
            default_window,
            max_window,
        }
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    /// Answer a free-text churn query.
    ///
    /// Zero records after the fetch — an empty window or a segment filter
    /// matching nothing — surface as `EmptyDatasetError` rather than ever
    /// reaching the aggregator.
    #[instrument(skip(self))]
    pub async fn handle_query(&self, query: &str) -> Result<ChurnSummary, PipelineError> {
        let intent = parse_intent(query, self.default_window, self.max_window);
        debug!(?intent, "parsed query intent");

        let records = self.fetch(&intent).await?;
        if records.is_empty() {
            warn!(?intent, "fetch returned zero records");
            return Err(EmptyDatasetError.into());
        }

        let summary = self.score_batch(&records)?;
        info!(
            customers = summary.customer_count,
            churners = summary.churn_count,
            rate = summary.churn_rate,
            "query summarized"
        );
        Ok(summary)
    }

    /// Score caller-provided records directly (the inbound prediction
    /// contract). Probabilities come back in input order.
    pub fn predict_records(
        &self,
        records: &[CustomerRecord],
    ) -> Result<Vec<f64>, PipelineError> {
        let vectors = encode_batch(self.engine.schema(), records)?;
        Ok(self.engine.predict_batch(&vectors)?)
    }

    async fn fetch(
        &self,
        intent: &QueryIntent,
    ) -> Result<Vec<CustomerRecord>, UpstreamFetchError> {
        match &intent.segment {
            Some(filter) => {
                let mut records = self
                    .source
                    .fetch_all_matching(filter.field, filter.value)
                    .await?;
                if let RecordSelection::LastN(n) = intent.selection {
                    if records.len() > n {
                        records.drain(..records.len() - n);
                    }
                }
                Ok(records)
            }
            None => match intent.selection {
                RecordSelection::LastN(n) => self.source.fetch_last(n).await,
                RecordSelection::All => self.source.fetch_all().await,
            },
        }
    }

    fn score_batch(&self, records: &[CustomerRecord]) -> Result<ChurnSummary, PipelineError> {
        let vectors = encode_batch(self.engine.schema(), records)?;
        let probabilities = self.engine.predict_batch(&vectors)?;
        let predictions: Vec<PredictionResult> = probabilities
            .iter()
            .enumerate()
            .map(|(record_index, &churn_probability)| PredictionResult {
                record_index,
                churn_probability,
            })
            .collect();
        Ok(summarize(records, &predictions, self.engine.threshold())?)
    }
}
