//! error.rs: Typed failures for configuration loading, document validation and the HTTP shell.
//!
//! Only `ConfigError` is fatal, and only at load time. `DocumentRejection` excludes a single
//! document and travels back to the caller as a warning; it never aborts a computation.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::document::Pillar;

/// Invalid or unusable scoring configuration. Raised while loading, never per request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scoring config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{var} points to non-existent path {path}")]
    MissingFile { var: &'static str, path: PathBuf },

    #[error("failed to parse scoring config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("sector weights table has no `default` entry")]
    MissingDefaultSector,

    #[error("sector `{sector}` has invalid weight {value} for pillar {pillar}")]
    InvalidSectorWeight {
        sector: String,
        pillar: Pillar,
        value: f64,
    },

    #[error("sector `{sector}` weights sum to {sum}; the sum must be positive")]
    NonPositiveWeightSum { sector: String, sum: f64 },

    #[error("sector `{sector}` weights are too large to sum as a finite number")]
    WeightSumOverflow { sector: String },

    #[error("{name} = {value} is outside its valid range {range}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error(
        "controversy tier bounds must satisfy 1 <= moderate < severe < critical <= 10 \
         (got moderate={moderate}, severe={severe}, critical={critical})"
    )]
    InvalidTierBounds {
        moderate: u8,
        severe: u8,
        critical: u8,
    },
}

/// Why a single document was left out of aggregation.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentRejection {
    #[error("sentiment {value} outside [-1, 1]")]
    SentimentOutOfRange { value: f64 },

    #[error("controversy severity {value} is not an integer in [0, 10]")]
    SeverityOutOfRange { value: f64 },

    #[error("topic relevance {value} for pillar {pillar} outside [0, 1]")]
    RelevanceOutOfRange { pillar: Pillar, value: f64 },
}

/// Request-level problems reported by the HTTP shell.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("entity_id must not be empty")]
    EmptyEntityId,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::EmptyEntityId => StatusCode::BAD_REQUEST,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
