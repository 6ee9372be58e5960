use std::sync::Mutex;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::result::ScoreResult;

pub const SCORE_REQUESTS_TOTAL: &str = "esg_score_requests_total";
pub const DOCUMENTS_REJECTED_TOTAL: &str = "esg_documents_rejected_total";
pub const SECTOR_FALLBACK_TOTAL: &str = "esg_sector_fallback_total";
pub const DOCUMENTS_SELECTED: &str = "esg_documents_selected";

static HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process; later (or concurrent) calls
    /// reuse the handle.
    pub fn init() -> Result<Self, BuildError> {
        // Held across install so only one caller ever reaches `install_recorder`.
        let mut slot = HANDLE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.as_ref() {
            return Ok(Self {
                handle: handle.clone(),
            });
        }

        // Default buckets keep the exposition stable across exporter versions.
        let handle = PrometheusBuilder::new().install_recorder()?;
        *slot = Some(handle.clone());
        drop(slot);

        // Register series up front so a fresh scrape already lists them.
        ::metrics::counter!(SCORE_REQUESTS_TOTAL).absolute(0);
        ::metrics::counter!(DOCUMENTS_REJECTED_TOTAL).absolute(0);
        ::metrics::counter!(SECTOR_FALLBACK_TOTAL).absolute(0);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Record one completed scoring run. No-op when no recorder is installed.
pub fn record_score(result: &ScoreResult) {
    ::metrics::counter!(SCORE_REQUESTS_TOTAL).increment(1);
    if !result.warnings.is_empty() {
        ::metrics::counter!(DOCUMENTS_REJECTED_TOTAL).increment(result.warnings.len() as u64);
    }
    if result.sector_used != result.sector {
        ::metrics::counter!(SECTOR_FALLBACK_TOTAL).increment(1);
    }
    ::metrics::histogram!(DOCUMENTS_SELECTED).record(result.documents_considered as f64);
}
