//! Batch aggregation: churn rate, customer count, summary
//!
//! Pure functions over an ordered sequence of predictions. Aggregation is
//! deterministic: the same batch and the same threshold always produce an
//! identical summary, including factor ordering.

use serde::Serialize;

use crate::errors::EmptyDatasetError;
use crate::record::{CustomerRecord, PredictionResult};

/// Segment-describing fields scanned for common traits among predicted
/// churners.
const FACTOR_FIELDS: [&str; 3] = ["Contract", "InternetService", "PaymentMethod"];

/// Maximum number of factors reported in a summary.
const MAX_FACTORS: usize = 3;

/// One recurring trait among the records predicted to churn.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChurnFactor {
    pub field: String,
    pub value: String,
    pub count: usize,
}

/// Aggregated churn metrics for one scored batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChurnSummary {
    /// Natural-language-ready description of the batch.
    pub summary: String,
    /// Churn rate as a percentage, rounded to two decimals for display.
    pub churn_rate: f64,
    /// Number of records actually scored.
    pub customer_count: usize,
    /// Records at or above the decision threshold.
    pub churn_count: usize,
    /// Most frequent traits among predicted churners, count-descending.
    pub top_factors: Vec<ChurnFactor>,
}

/// Aggregate a scored batch into a [`ChurnSummary`].
///
/// `records` and `predictions` are aligned by `record_index`. An empty
/// batch is a reported error, never a division by zero.
pub fn summarize(
    records: &[CustomerRecord],
    predictions: &[PredictionResult],
    threshold: f64,
) -> Result<ChurnSummary, EmptyDatasetError> {
    if records.is_empty() || predictions.is_empty() {
        return Err(EmptyDatasetError);
    }

    let customer_count = predictions.len();
    let churners: Vec<&PredictionResult> = predictions
        .iter()
        .filter(|p| p.churn_probability >= threshold)
        .collect();
    let churn_count = churners.len();

    let churn_rate = round2((churn_count as f64 / customer_count as f64) * 100.0);
    let top_factors = top_factors(records, &churners);

    let mut summary = format!(
        "Out of {customer_count} customer records, {churn_count} customers are predicted to churn, resulting in a churn rate of {churn_rate:.2}%."
    );
    if !top_factors.is_empty() {
        let traits: Vec<String> = top_factors
            .iter()
            .map(|f| format!("{}={} ({})", f.field, f.value, f.count))
            .collect();
        summary.push_str(&format!(
            " Most common traits among predicted churners: {}.",
            traits.join(", ")
        ));
    }

    Ok(ChurnSummary {
        summary,
        churn_rate,
        customer_count,
        churn_count,
        top_factors,
    })
}

/// Most frequent field=value pairs among predicted churners, ranked by
/// count descending with a lexicographic tie-break on field then value.
fn top_factors(
    records: &[CustomerRecord],
    churners: &[&PredictionResult],
) -> Vec<ChurnFactor> {
    let mut counts: Vec<ChurnFactor> = Vec::new();

    for prediction in churners {
        let Some(record) = records.get(prediction.record_index) else {
            continue;
        };
        for field in FACTOR_FIELDS {
            let Some(value) = record.categorical(field) else {
                continue;
            };
            match counts
                .iter_mut()
                .find(|f| f.field == field && f.value == value)
            {
                Some(factor) => factor.count += 1,
                None => counts.push(ChurnFactor {
                    field: field.to_string(),
                    value: value.to_string(),
                    count: 1,
                }),
            }
        }
    }

    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.field.cmp(&b.field))
            .then_with(|| a.value.cmp(&b.value))
    });
    counts.truncate(MAX_FACTORS);
    counts
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
