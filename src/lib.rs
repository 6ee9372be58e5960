// src/lib.rs
// Public library surface for the HTTP binary, the demo binary and integration tests.

pub mod api;
pub mod composite;
pub mod config;
pub mod controversy;
pub mod corpus;
pub mod decay;
pub mod document;
pub mod engine;
pub mod error;
pub mod explain;
pub mod metrics;
pub mod pillar;
pub mod result;
pub mod sector_weights;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState, ScoreRequest};
pub use crate::config::{ScoringConfig, ScoringParams};
pub use crate::document::{Document, Pillar, SeverityTier, TopicRelevance};
pub use crate::engine::compute_score;
pub use crate::error::{ApiError, ConfigError, DocumentRejection};
pub use crate::explain::{Explanation, Factor, FactorKind, PillarExplanation};
pub use crate::result::ScoreResult;
