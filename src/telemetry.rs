//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise `DEFAULT_LOG_FILTER`. `ESG_LOG_FORMAT=json`
//! switches from compact lines to JSON records.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "esg_scoring_engine=info,esg=info,warn";
pub const ENV_LOG_FORMAT: &str = "ESG_LOG_FORMAT";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    /// A global subscriber is already installed (e.g. by the hosting runtime).
    #[error("telemetry error: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

fn env_filter() -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(DEFAULT_LOG_FILTER).map_err(|source| {
            TelemetryError::EnvFilter {
                value: DEFAULT_LOG_FILTER.to_string(),
                source,
            }
        }),
    }
}

fn json_requested() -> bool {
    std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

pub fn init() -> Result<(), TelemetryError> {
    let filter = env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    if json_requested() {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry
            .with(fmt::layer().compact().with_ansi(false))
            .try_init()?;
    }
    Ok(())
}
