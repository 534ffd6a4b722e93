//! Data source collaborators
//!
//! The orchestrator consumes an ordered fetch-by-window capability; it
//! never owns the storage. Two implementations ship here: a local JSON
//! snapshot for development and tests, and a remote HTTP endpoint behind
//! the `remote_source` feature.

use std::path::PathBuf;

use async_trait::async_trait;
use churn_core::record::CustomerRecord;
use tracing::debug;

use crate::errors::UpstreamFetchError;

/// Ordered customer-record source.
///
/// Implementations return records in source order (oldest first), so
/// "last n" is always the tail of the sequence.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the most recent `n` records.
    async fn fetch_last(&self, n: usize) -> Result<Vec<CustomerRecord>, UpstreamFetchError>;

    /// Fetch every record the source holds.
    async fn fetch_all(&self) -> Result<Vec<CustomerRecord>, UpstreamFetchError>;

    /// Fetch all records whose `field` equals `value`.
    async fn fetch_all_matching(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<CustomerRecord>, UpstreamFetchError> {
        let records = self.fetch_all().await?;
        Ok(records
            .into_iter()
            .filter(|record| record.categorical(field) == Some(value))
            .collect())
    }
}

/// JSON-array snapshot on local disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    async fn fetch_last(&self, n: usize) -> Result<Vec<CustomerRecord>, UpstreamFetchError> {
        let mut records = self.fetch_all().await?;
        if records.len() > n {
            records.drain(..records.len() - n);
        }
        Ok(records)
    }

    async fn fetch_all(&self) -> Result<Vec<CustomerRecord>, UpstreamFetchError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<CustomerRecord> = serde_json::from_str(&json)
            .map_err(|e| UpstreamFetchError::Decode(e.to_string()))?;
        debug!(path = %self.path.display(), records = records.len(), "loaded snapshot");
        Ok(records)
    }
}

/// Remote fetch-by-window endpoint returning JSON arrays of records.
///
/// `GET {base_url}` returns all records; `GET {base_url}?last={n}`
/// returns the most recent `n`.
#[cfg(feature = "remote_source")]
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "remote_source")]
impl HttpDataSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_records(&self, url: &str) -> Result<Vec<CustomerRecord>, UpstreamFetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let records = response.json::<Vec<CustomerRecord>>().await?;
        debug!(url, records = records.len(), "fetched remote window");
        Ok(records)
    }
}

#[cfg(feature = "remote_source")]
#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_last(&self, n: usize) -> Result<Vec<CustomerRecord>, UpstreamFetchError> {
        let url = format!("{}?last={}", self.base_url, n);
        self.get_records(&url).await
    }

    async fn fetch_all(&self) -> Result<Vec<CustomerRecord>, UpstreamFetchError> {
        self.get_records(&self.base_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn snapshot_json() -> String {
        let mut records = Vec::new();
        for (i, contract) in [
            "Month-to-month",
            "Two year",
            "Month-to-month",
            "One year",
        ]
        .iter()
        .enumerate()
        {
            records.push(serde_json::json!({
                "gender": "Female",
                "SeniorCitizen": 0,
                "Partner": "No",
                "Dependents": "No",
                "tenure": i as u32 + 1,
                "PhoneService": "Yes",
                "MultipleLines": "No",
                "InternetService": "DSL",
                "OnlineSecurity": "No",
                "OnlineBackup": "No",
                "DeviceProtection": "No",
                "TechSupport": "No",
                "StreamingTV": "No",
                "StreamingMovies": "No",
                "Contract": contract,
                "PaperlessBilling": "Yes",
                "PaymentMethod": "Mailed check",
                "MonthlyCharges": 30.0,
                "TotalCharges": 30.0 * (i as f64 + 1.0)
            }));
        }
        serde_json::to_string(&records).unwrap()
    }

    fn write_snapshot(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn fetch_all_returns_source_order() {
        let file = write_snapshot(&snapshot_json());
        let source = JsonFileSource::new(file.path());

        let records = source.fetch_all().await.unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].tenure, 1);
        assert_eq!(records[3].tenure, 4);
    }

    #[tokio::test]
    async fn fetch_last_takes_the_tail() {
        let file = write_snapshot(&snapshot_json());
        let source = JsonFileSource::new(file.path());

        let records = source.fetch_last(2).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tenure, 3);
        assert_eq!(records[1].tenure, 4);
    }

    #[tokio::test]
    async fn fetch_last_beyond_size_returns_everything() {
        let file = write_snapshot(&snapshot_json());
        let source = JsonFileSource::new(file.path());

        let records = source.fetch_last(100).await.unwrap();
        assert_eq!(records.len(), 4);
    }

    #[tokio::test]
    async fn fetch_all_matching_filters_by_field() {
        let file = write_snapshot(&snapshot_json());
        let source = JsonFileSource::new(file.path());

        let records = source
            .fetch_all_matching("Contract", "Month-to-month")
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.contract == "Month-to-month"));
    }

    #[tokio::test]
    async fn unmatched_filter_returns_empty() {
        let file = write_snapshot(&snapshot_json());
        let source = JsonFileSource::new(file.path());

        let records = source
            .fetch_all_matching("Contract", "Decade")
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_a_transport_class_error() {
        let source = JsonFileSource::new("/nonexistent/customers.json");
        assert!(matches!(
            source.fetch_all().await,
            Err(UpstreamFetchError::Io(_))
        ));
    }

    #[tokio::test]
    async fn malformed_snapshot_is_a_decode_error() {
        let file = write_snapshot("{\"not\": \"an array\"}");
        let source = JsonFileSource::new(file.path());
        assert!(matches!(
            source.fetch_all().await,
            Err(UpstreamFetchError::Decode(_))
        ));
    }
}
