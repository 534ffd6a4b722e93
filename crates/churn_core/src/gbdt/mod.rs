//! GBDT (Gradient Boosted Decision Tree) inference engine
//!
//! Deterministic evaluation of a pretrained boosting ensemble:
//!
//! - **Pure inference**: no mutation of model state, no online learning
//! - **Deterministic**: the same feature vector always yields the same
//!   probability against a fixed artifact
//! - **Canonical serialization**: models hash over sorted-key JSON
//! - **Blake3 hashing**: fast, deterministic artifact verification
//!
//! # Model Format
//!
//! Models are serialized as canonical JSON with the following structure:
//!
//! ```json
//! {
//!   "version": 1,
//!   "n_features": 23,
//!   "base_score": 0.0,
//!   "trees": [
//!     {
//!       "nodes": [
//!         {"id":0,"left":1,"right":2,"feature_idx":3,"threshold":12.5,"leaf":null},
//!         {"id":1,"left":-1,"right":-1,"feature_idx":-1,"threshold":0.0,"leaf":0.8},
//!         {"id":2,"left":-1,"right":-1,"feature_idx":-1,"threshold":0.0,"leaf":-0.6}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Leaves carry margin-space contributions; `binary:logistic` ensembles map
//! the accumulated margin through a sigmoid to produce a probability.

pub mod model;
pub mod tree;

// Re-export main types for convenience
pub use model::{sigmoid, Model, ModelError};
pub use tree::{Node, Tree};
