//! Deterministic fixtures for integration tests and downstream crates.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::artifact::{ArtifactMetadata, ChurnModelArtifact};
use crate::engine::InferenceEngine;
use crate::gbdt::{Model, Node, Tree};
use crate::record::CustomerRecord;
use crate::schema::EncodingSchema;

/// A small two-tree ensemble over the canonical telco schema.
///
/// Tree 1 splits on tenure (column 3): short tenure is churn-leaning.
/// Tree 2 splits on the `Contract_Two year` indicator (column 18):
/// two-year contracts are retain-leaning.
pub fn sample_artifact() -> ChurnModelArtifact {
    let schema = EncodingSchema::telco();
    let n = schema.feature_len();

    let tenure_tree = Tree::new(vec![
        Node::internal(0, 3, 12.0, 1, 2),
        Node::leaf(1, 1.2),
        Node::leaf(2, -0.8),
    ]);
    let contract_tree = Tree::new(vec![
        Node::internal(0, 18, 0.5, 1, 2),
        Node::leaf(1, 0.4),
        Node::leaf(2, -1.5),
    ]);

    let model = Model::new(n, vec![tenure_tree, contract_tree], 0.0);
    let artifact = ChurnModelArtifact::new(
        ArtifactMetadata {
            version: "telco-churn/1".to_string(),
            trained_at: Utc.with_ymd_and_hms(2025, 11, 4, 9, 30, 0).unwrap(),
            decision_threshold: 0.5,
        },
        schema,
        model,
    );
    artifact
        .validate()
        .expect("fixture artifact must be valid");
    artifact
}

/// Engine over [`sample_artifact`].
pub fn sample_engine() -> InferenceEngine {
    InferenceEngine::new(Arc::new(sample_artifact()))
}

/// A record the fixture model predicts as a churner (short tenure,
/// month-to-month contract).
pub fn churner_record() -> CustomerRecord {
    CustomerRecord {
        gender: "Male".to_string(),
        senior_citizen: 0,
        partner: "Yes".to_string(),
        dependents: "No".to_string(),
        tenure: 6,
        phone_service: "Yes".to_string(),
        multiple_lines: "No".to_string(),
        internet_service: "Fiber optic".to_string(),
        online_security: "No".to_string(),
        online_backup: "No".to_string(),
        device_protection: "No".to_string(),
        tech_support: "No".to_string(),
        streaming_tv: "Yes".to_string(),
        streaming_movies: "Yes".to_string(),
        contract: "Month-to-month".to_string(),
        paperless_billing: "Yes".to_string(),
        payment_method: "Electronic check".to_string(),
        monthly_charges: 95.0,
        total_charges: 570.0,
    }
}

/// A record the fixture model predicts as loyal (long tenure, two-year
/// contract).
pub fn loyal_record() -> CustomerRecord {
    CustomerRecord {
        gender: "Female".to_string(),
        senior_citizen: 0,
        partner: "Yes".to_string(),
        dependents: "Yes".to_string(),
        tenure: 60,
        phone_service: "Yes".to_string(),
        multiple_lines: "Yes".to_string(),
        internet_service: "DSL".to_string(),
        online_security: "Yes".to_string(),
        online_backup: "Yes".to_string(),
        device_protection: "Yes".to_string(),
        tech_support: "Yes".to_string(),
        streaming_tv: "No".to_string(),
        streaming_movies: "No".to_string(),
        contract: "Two year".to_string(),
        paperless_billing: "No".to_string(),
        payment_method: "Bank transfer (automatic)".to_string(),
        monthly_charges: 55.0,
        total_charges: 3300.0,
    }
}
