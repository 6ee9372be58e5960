//! ESG Scoring Service: Binary Entrypoint
//! Boots the Axum HTTP server: loads the scoring config once, wires `/score`,
//! the debug routes and `/metrics`.

use esg_scoring_engine::api::{self, AppState};
use esg_scoring_engine::config::ScoringConfig;
use esg_scoring_engine::metrics::Metrics;
use esg_scoring_engine::telemetry;
use shuttle_axum::ShuttleAxum;
use tracing::{debug, info};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Makes ESG_SCORING_CONFIG_PATH / RUST_LOG from .env visible to the loaders below.
    let _ = dotenvy::dotenv();

    // The Shuttle runtime may already own the global subscriber.
    if let Err(e) = telemetry::init() {
        debug!(error = %e, "keeping existing tracing subscriber");
    }

    // --- Scoring config (fatal if present but invalid) ---
    let config = ScoringConfig::load().map_err(anyhow::Error::from)?;
    info!(
        sectors = config.sectors().len(),
        lookback_days = config.params().lookback_window_days,
        "scoring config ready"
    );

    let metrics = Metrics::init().map_err(anyhow::Error::from)?;

    let router = api::router(AppState::new(config)).merge(metrics.router());

    Ok(router.into())
}
