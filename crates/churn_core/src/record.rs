//! Customer record wire types
//!
//! `CustomerRecord` carries the exact field names of the inbound prediction
//! contract (PascalCase categoricals, numeric tenure/charges). Records are
//! immutable once fetched; identity is row position in the source window.

use serde::{Deserialize, Serialize};

/// One customer row as delivered by the data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    pub gender: String,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: u8,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    pub tenure: u32,
    #[serde(rename = "PhoneService")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
}

impl CustomerRecord {
    /// Wire names of all categorical fields, in contract order.
    pub const CATEGORICAL_FIELDS: [&'static str; 15] = [
        "gender",
        "Partner",
        "Dependents",
        "PhoneService",
        "MultipleLines",
        "InternetService",
        "OnlineSecurity",
        "OnlineBackup",
        "DeviceProtection",
        "TechSupport",
        "StreamingTV",
        "StreamingMovies",
        "Contract",
        "PaperlessBilling",
        "PaymentMethod",
    ];

    /// Look up a categorical field by its wire name.
    pub fn categorical(&self, field: &str) -> Option<&str> {
        let value = match field {
            "gender" => &self.gender,
            "Partner" => &self.partner,
            "Dependents" => &self.dependents,
            "PhoneService" => &self.phone_service,
            "MultipleLines" => &self.multiple_lines,
            "InternetService" => &self.internet_service,
            "OnlineSecurity" => &self.online_security,
            "OnlineBackup" => &self.online_backup,
            "DeviceProtection" => &self.device_protection,
            "TechSupport" => &self.tech_support,
            "StreamingTV" => &self.streaming_tv,
            "StreamingMovies" => &self.streaming_movies,
            "Contract" => &self.contract,
            "PaperlessBilling" => &self.paperless_billing,
            "PaymentMethod" => &self.payment_method,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Look up a numeric field by its wire name.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            "SeniorCitizen" => Some(f64::from(self.senior_citizen)),
            "tenure" => Some(f64::from(self.tenure)),
            "MonthlyCharges" => Some(self.monthly_charges),
            "TotalCharges" => Some(self.total_charges),
            _ => None,
        }
    }
}

/// Churn probability for one scored record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    /// Position of the record in the scored batch.
    pub record_index: usize,
    /// Probability of churn in [0, 1].
    pub churn_probability: f64,
}
