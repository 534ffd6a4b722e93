//! Batch inference benchmark: encode + predict over representative
//! windows of customer records.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use churn_core::artifact::{ArtifactMetadata, ChurnModelArtifact};
use churn_core::encoder::encode_batch;
use churn_core::engine::InferenceEngine;
use churn_core::gbdt::{Model, Node, Tree};
use churn_core::record::CustomerRecord;
use churn_core::schema::EncodingSchema;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_artifact() -> ChurnModelArtifact {
    let schema = EncodingSchema::telco();
    let n = schema.feature_len();

    // A deeper ensemble than the unit-test fixtures so traversal cost is
    // visible: 32 identical three-level trees over tenure and charges.
    let tree = Tree::new(vec![
        Node::internal(0, 3, 12.0, 1, 2),
        Node::internal(1, 5, 70.0, 3, 4),
        Node::internal(2, 6, 1500.0, 5, 6),
        Node::leaf(3, 0.4),
        Node::leaf(4, 0.9),
        Node::leaf(5, -0.7),
        Node::leaf(6, -0.2),
    ]);
    let trees = vec![tree; 32];

    ChurnModelArtifact::new(
        ArtifactMetadata {
            version: "telco-churn/bench".to_string(),
            trained_at: Utc.with_ymd_and_hms(2025, 11, 4, 9, 30, 0).unwrap(),
            decision_threshold: 0.5,
        },
        schema,
        Model::new(n, trees, 0.0),
    )
}

fn bench_record(i: u32) -> CustomerRecord {
    CustomerRecord {
        gender: if i % 2 == 0 { "Male" } else { "Female" }.to_string(),
        senior_citizen: (i % 5 == 0) as u8,
        partner: "No".to_string(),
        dependents: "No".to_string(),
        tenure: i % 72,
        phone_service: "Yes".to_string(),
        multiple_lines: "No".to_string(),
        internet_service: "Fiber optic".to_string(),
        online_security: "No".to_string(),
        online_backup: "No".to_string(),
        device_protection: "No".to_string(),
        tech_support: "No".to_string(),
        streaming_tv: "No".to_string(),
        streaming_movies: "No".to_string(),
        contract: "Month-to-month".to_string(),
        paperless_billing: "Yes".to_string(),
        payment_method: "Electronic check".to_string(),
        monthly_charges: 40.0 + f64::from(i % 60),
        total_charges: f64::from(i % 72) * 70.0,
    }
}

fn batch_inference(c: &mut Criterion) {
    let engine = InferenceEngine::new(Arc::new(bench_artifact()));

    for &size in &[50usize, 500, 2000] {
        let records: Vec<CustomerRecord> = (0..size as u32).map(bench_record).collect();

        c.bench_function(&format!("encode_predict_{size}"), |b| {
            b.iter(|| {
                let vectors = encode_batch(engine.schema(), black_box(&records)).unwrap();
                let probabilities = engine.predict_batch(&vectors).unwrap();
                black_box(probabilities)
            })
        });
    }
}

criterion_group!(benches, batch_inference);
criterion_main!(benches);
