use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::ScoringConfig;
use crate::document::{Document, Pillar};
use crate::engine::compute_score;
use crate::error::ApiError;
use crate::metrics;
use crate::result::ScoreResult;

#[derive(Clone)]
pub struct AppState {
    config: Arc<ScoringConfig>,
}

impl AppState {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/score", post(score))
        .route("/debug/sector-weight", get(debug_sector_weight))
        .route("/debug/config", get(debug_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Body of `POST /score`; also the input format of the `score_demo` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub entity_id: String,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub documents: Vec<Document>,
}

async fn score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResult>, ApiError> {
    if req.entity_id.trim().is_empty() {
        return Err(ApiError::EmptyEntityId);
    }

    let result = compute_score(
        &req.entity_id,
        req.as_of,
        &req.sector,
        &req.documents,
        &state.config,
    );

    metrics::record_score(&result);

    info!(
        entity = %req.entity_id,
        supplied = req.documents.len(),
        rejected = result.warnings.len(),
        composite = result.composite,
        "POST /score"
    );
    Ok(Json(result))
}

async fn debug_sector_weight(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> String {
    let s = q.get("sector").cloned().unwrap_or_default();
    let r = state.config.sectors().resolve(&s);
    let w = |p: Pillar| r.weights.get(p);
    format!(
        "sector='{}' -> {}{} (E {:.2}, S {:.2}, G {:.2})",
        s,
        r.name,
        if r.fallback { " [fallback]" } else { "" },
        w(Pillar::Environmental),
        w(Pillar::Social),
        w(Pillar::Governance),
    )
}

async fn debug_config(State(state): State<AppState>) -> Json<ScoringConfig> {
    Json((*state.config).clone())
}
