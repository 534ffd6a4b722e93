//! Encoding schema: the unit of train/serve parity
//!
//! The schema fixes everything the trained ensemble assumes about its
//! inputs: which fields are read, in which order, how categoricals map to
//! columns, and the normalization parameters fitted at training time. It is
//! versioned inside the model artifact and never edited independently of
//! the ensemble it was trained with.

use serde::{Deserialize, Serialize};

/// Standard-scaler parameters fitted at training time.
///
/// Stored verbatim and reused at inference; never re-fit on serving data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalerParams {
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
}

impl ScalerParams {
    /// Apply `(x - mean) / std` in place. Lengths are checked at artifact
    /// load, so this assumes a vector of matching dimension.
    pub fn apply(&self, features: &mut [f64]) {
        for (i, value) in features.iter_mut().enumerate() {
            *value = (*value - self.means[i]) / self.std_devs[i];
        }
    }
}

/// How a single record field maps onto feature columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Numeric passthrough (one column).
    Numeric,
    /// Yes/No to 1/0 (one column).
    Binary,
    /// One-hot with the training-time baseline dropped. `emitted` lists the
    /// categories that receive a column, in training column order. A value
    /// outside `baseline` + `emitted` maps to `unknown` if the training
    /// pipeline declared such a bucket, and is rejected otherwise.
    OneHot {
        baseline: String,
        emitted: Vec<String>,
        #[serde(default)]
        unknown: Option<String>,
    },
}

/// One field of the encoding schema, in feature-column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldEncoding {
    /// Wire name of the source field.
    pub field: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Value collapses applied before lookup, e.g.
    /// "No internet service" -> "No".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<(String, String)>,
}

impl FieldEncoding {
    pub fn numeric(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldKind::Numeric,
            aliases: Vec::new(),
        }
    }

    pub fn binary(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldKind::Binary,
            aliases: Vec::new(),
        }
    }

    pub fn one_hot(field: &str, baseline: &str, emitted: &[&str]) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldKind::OneHot {
                baseline: baseline.to_string(),
                emitted: emitted.iter().map(|s| s.to_string()).collect(),
                unknown: None,
            },
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, from: &str, to: &str) -> Self {
        self.aliases.push((from.to_string(), to.to_string()));
        self
    }

    /// Resolve collapse aliases for a raw value.
    pub fn collapse<'a>(&'a self, raw: &'a str) -> &'a str {
        for (from, to) in &self.aliases {
            if raw == from {
                return to;
            }
        }
        raw
    }

    /// Number of feature columns this field produces.
    pub fn width(&self) -> usize {
        match &self.kind {
            FieldKind::Numeric | FieldKind::Binary => 1,
            FieldKind::OneHot { emitted, .. } => emitted.len(),
        }
    }

    /// Column names in training-matrix convention (`Field_Value` for
    /// one-hot columns).
    pub fn column_names(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::Numeric | FieldKind::Binary => vec![self.field.clone()],
            FieldKind::OneHot { emitted, .. } => emitted
                .iter()
                .map(|category| format!("{}_{}", self.field, category))
                .collect(),
        }
    }
}

/// Complete encoding schema: ordered field encodings plus optional
/// normalization fitted at training time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncodingSchema {
    pub fields: Vec<FieldEncoding>,
    #[serde(default)]
    pub scaler: Option<ScalerParams>,
}

impl EncodingSchema {
    /// Total feature-vector dimension.
    pub fn feature_len(&self) -> usize {
        self.fields.iter().map(FieldEncoding::width).sum()
    }

    /// Feature column names in vector order.
    pub fn feature_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|f| f.column_names())
            .collect()
    }

    pub fn with_scaler(mut self, scaler: ScalerParams) -> Self {
        self.scaler = Some(scaler);
        self
    }

    /// Validate schema structure.
    pub fn validate(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("schema has no fields".to_string());
        }

        for encoding in &self.fields {
            if let FieldKind::OneHot {
                baseline,
                emitted,
                unknown,
            } = &encoding.kind
            {
                if emitted.is_empty() {
                    return Err(format!(
                        "one-hot field {} emits no columns",
                        encoding.field
                    ));
                }
                if emitted.iter().any(|c| c == baseline) {
                    return Err(format!(
                        "one-hot field {} emits its own baseline {baseline:?}",
                        encoding.field
                    ));
                }
                let mut seen = emitted.clone();
                seen.sort();
                seen.dedup();
                if seen.len() != emitted.len() {
                    return Err(format!(
                        "one-hot field {} has duplicate categories",
                        encoding.field
                    ));
                }
                if let Some(bucket) = unknown {
                    if bucket != baseline && !emitted.contains(bucket) {
                        return Err(format!(
                            "one-hot field {} routes unknowns to undeclared category {bucket:?}",
                            encoding.field
                        ));
                    }
                }
            }
        }

        if let Some(scaler) = &self.scaler {
            let len = self.feature_len();
            if scaler.means.len() != len || scaler.std_devs.len() != len {
                return Err(format!(
                    "scaler covers {} features, schema defines {}",
                    scaler.means.len(),
                    len
                ));
            }
            if scaler.std_devs.iter().any(|&s| !(s > 0.0) || !s.is_finite()) {
                return Err("scaler has a non-positive or non-finite std dev".to_string());
            }
            if scaler.means.iter().any(|m| !m.is_finite()) {
                return Err("scaler has a non-finite mean".to_string());
            }
        }

        Ok(())
    }

    /// The canonical telco churn schema, matching the training pipeline:
    /// service-collapse aliases, yes/no binaries, one-hot blocks with the
    /// training baselines dropped, passthrough columns first. Scaler
    /// parameters are attached from the artifact, not defined here.
    pub fn telco() -> Self {
        let service_fields = [
            "OnlineSecurity",
            "OnlineBackup",
            "DeviceProtection",
            "TechSupport",
            "StreamingTV",
            "StreamingMovies",
        ];

        let mut fields = vec![
            FieldEncoding::numeric("SeniorCitizen"),
            FieldEncoding::binary("Partner"),
            FieldEncoding::binary("Dependents"),
            FieldEncoding::numeric("tenure"),
            FieldEncoding::binary("PhoneService"),
            FieldEncoding::numeric("MonthlyCharges"),
            FieldEncoding::numeric("TotalCharges"),
            FieldEncoding::one_hot("gender", "Female", &["Male"]),
            FieldEncoding::one_hot("MultipleLines", "No", &["Yes"])
                .with_alias("No phone service", "No"),
            FieldEncoding::one_hot("InternetService", "DSL", &["Fiber optic", "No"]),
        ];

        for field in service_fields {
            fields.push(
                FieldEncoding::one_hot(field, "No", &["Yes"])
                    .with_alias("No internet service", "No"),
            );
        }

        fields.push(FieldEncoding::one_hot(
            "Contract",
            "Month-to-month",
            &["One year", "Two year"],
        ));
        fields.push(FieldEncoding::one_hot("PaperlessBilling", "No", &["Yes"]));
        fields.push(FieldEncoding::one_hot(
            "PaymentMethod",
            "Bank transfer (automatic)",
            &[
                "Credit card (automatic)",
                "Electronic check",
                "Mailed check",
            ],
        ));

        Self {
            fields,
            scaler: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telco_schema_has_training_dimension() {
        let schema = EncodingSchema::telco();
        assert_eq!(schema.feature_len(), 23);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn telco_column_order_matches_training_matrix() {
        let names = EncodingSchema::telco().feature_names();
        assert_eq!(names[0], "SeniorCitizen");
        assert_eq!(names[6], "TotalCharges");
        assert_eq!(names[7], "gender_Male");
        assert_eq!(names[9], "InternetService_Fiber optic");
        assert_eq!(names[10], "InternetService_No");
        assert_eq!(names[17], "Contract_One year");
        assert_eq!(names[22], "PaymentMethod_Mailed check");
    }

    #[test]
    fn alias_collapses_service_values() {
        let schema = EncodingSchema::telco();
        let online_security = schema
            .fields
            .iter()
            .find(|f| f.field == "OnlineSecurity")
            .unwrap();
        assert_eq!(online_security.collapse("No internet service"), "No");
        assert_eq!(online_security.collapse("Yes"), "Yes");
    }

    #[test]
    fn validate_rejects_baseline_in_emitted() {
        let schema = EncodingSchema {
            fields: vec![FieldEncoding::one_hot("Contract", "One year", &["One year"])],
            scaler: None,
        };
        assert!(schema.validate().is_err());
    }

    #[test]
    fn validate_rejects_scaler_length_mismatch() {
        let schema = EncodingSchema::telco().with_scaler(ScalerParams {
            means: vec![0.0; 5],
            std_devs: vec![1.0; 5],
        });
        assert!(schema.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_std_dev() {
        let len = EncodingSchema::telco().feature_len();
        let schema = EncodingSchema::telco().with_scaler(ScalerParams {
            means: vec![0.0; len],
            std_devs: vec![0.0; len],
        });
        assert!(schema.validate().is_err());
    }

    #[test]
    fn schema_round_trips_through_json() {
        let schema = EncodingSchema::telco();
        let json = serde_json::to_string(&schema).unwrap();
        let restored: EncodingSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, restored);
    }
}
