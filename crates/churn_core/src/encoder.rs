//! Feature encoding for churn records
//!
//! Maps raw customer records to fixed-order numeric feature vectors using
//! the encoding schema shipped inside the model artifact. Encoding is
//! deterministic: the same record and schema always produce the same
//! vector.

use crate::errors::EncodingError;
use crate::record::CustomerRecord;
use crate::schema::{EncodingSchema, FieldKind};

/// Feature vector in model input order.
pub type FeatureVector = Vec<f64>;

/// Encode one record into a feature vector.
///
/// Fails with an [`EncodingError`] naming the field when a categorical
/// value was never seen at training time (and the schema declares no
/// unknown bucket for it) or when a numeric value is non-finite.
pub fn encode_record(
    schema: &EncodingSchema,
    record: &CustomerRecord,
) -> Result<FeatureVector, EncodingError> {
    let mut features = Vec::with_capacity(schema.feature_len());

    for encoding in &schema.fields {
        match &encoding.kind {
            FieldKind::Numeric => {
                let value =
                    record
                        .numeric(&encoding.field)
                        .ok_or_else(|| EncodingError::MissingField {
                            field: encoding.field.clone(),
                        })?;
                if !value.is_finite() {
                    return Err(EncodingError::MalformedNumeric {
                        field: encoding.field.clone(),
                        value,
                    });
                }
                features.push(value);
            }
            FieldKind::Binary => {
                let raw = record
                    .categorical(&encoding.field)
                    .ok_or_else(|| EncodingError::MissingField {
                        field: encoding.field.clone(),
                    })?;
                match encoding.collapse(raw) {
                    "Yes" => features.push(1.0),
                    "No" => features.push(0.0),
                    _ => {
                        return Err(EncodingError::UnknownCategory {
                            field: encoding.field.clone(),
                            value: raw.to_string(),
                        })
                    }
                }
            }
            FieldKind::OneHot {
                baseline,
                emitted,
                unknown,
            } => {
                let raw = record
                    .categorical(&encoding.field)
                    .ok_or_else(|| EncodingError::MissingField {
                        field: encoding.field.clone(),
                    })?;
                let collapsed = encoding.collapse(raw);
                let category = if collapsed == baseline || emitted.iter().any(|c| c == collapsed)
                {
                    collapsed
                } else if let Some(bucket) = unknown {
                    bucket.as_str()
                } else {
                    return Err(EncodingError::UnknownCategory {
                        field: encoding.field.clone(),
                        value: raw.to_string(),
                    });
                };
                for candidate in emitted {
                    features.push(if candidate == category { 1.0 } else { 0.0 });
                }
            }
        }
    }

    if let Some(scaler) = &schema.scaler {
        scaler.apply(&mut features);
    }

    Ok(features)
}

/// Encode a batch of records, preserving input order.
pub fn encode_batch(
    schema: &EncodingSchema,
    records: &[CustomerRecord],
) -> Result<Vec<FeatureVector>, EncodingError> {
    records
        .iter()
        .map(|record| encode_record(schema, record))
        .collect()
}
