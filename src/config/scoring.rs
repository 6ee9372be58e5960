// src/config/scoring.rs
//! Scoring configuration: decay/penalty constants, controversy tiers and the sector table.
//!
//! TOML shape:
//! ```toml
//! [scoring]
//! decay_factor = 0.5
//! reference_period_days = 365.0
//! penalty_scale = 0.5
//! neutral_baseline = 5.0
//! explanation_impact_threshold = 0.05
//! lookback_window_days = 365
//!
//! [controversy.tiers]
//! moderate = 4
//! severe = 7
//! critical = 9
//!
//! [sectors.default]
//! E = 0.33
//! S = 0.33
//! G = 0.34
//! ```
//!
//! Loaded once at startup and immutable afterwards. Every construction path validates,
//! so an engine holding a `ScoringConfig` never sees an invalid one.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::controversy::TierBounds;
use crate::error::ConfigError;
use crate::sector_weights::{RawSectorWeights, SectorWeightsTable};

pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";
pub const ENV_SCORING_CONFIG_PATH: &str = "ESG_SCORING_CONFIG_PATH";

/// Numeric constants of the scoring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Weight of a document exactly one reference period old, in (0, 1].
    pub decay_factor: f64,
    pub reference_period_days: f64,
    /// Penalty per severity point before decay.
    pub penalty_scale: f64,
    /// Score reported when a pillar has no usable evidence.
    pub neutral_baseline: f64,
    /// Explanation factors with |impact| below this are listed separately.
    pub explanation_impact_threshold: f64,
    pub lookback_window_days: u32,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            decay_factor: 0.5,
            reference_period_days: 365.0,
            penalty_scale: 0.5,
            neutral_baseline: 5.0,
            explanation_impact_threshold: 0.05,
            lookback_window_days: 365,
        }
    }
}

impl ScoringParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn out_of_range(name: &'static str, value: f64, range: &'static str) -> ConfigError {
            ConfigError::OutOfRange { name, value, range }
        }

        if !(self.decay_factor > 0.0 && self.decay_factor <= 1.0) {
            return Err(out_of_range("decay_factor", self.decay_factor, "(0, 1]"));
        }
        if !(self.reference_period_days.is_finite() && self.reference_period_days > 0.0) {
            return Err(out_of_range(
                "reference_period_days",
                self.reference_period_days,
                "(0, inf)",
            ));
        }
        if !(self.penalty_scale.is_finite() && self.penalty_scale >= 0.0) {
            return Err(out_of_range("penalty_scale", self.penalty_scale, "[0, inf)"));
        }
        if !(0.0..=10.0).contains(&self.neutral_baseline) {
            return Err(out_of_range(
                "neutral_baseline",
                self.neutral_baseline,
                "[0, 10]",
            ));
        }
        if !(self.explanation_impact_threshold.is_finite()
            && self.explanation_impact_threshold >= 0.0)
        {
            return Err(out_of_range(
                "explanation_impact_threshold",
                self.explanation_impact_threshold,
                "[0, inf)",
            ));
        }
        if self.lookback_window_days == 0 {
            return Err(out_of_range(
                "lookback_window_days",
                0.0,
                "[1, 4294967295]",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControversySection {
    #[serde(default)]
    pub tiers: TierBounds,
}

/// Validated, immutable scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringConfig {
    scoring: ScoringParams,
    controversy: ControversySection,
    sectors: SectorWeightsTable,
}

/// File layout before validation.
#[derive(Debug, Deserialize)]
struct RawScoringConfig {
    #[serde(default)]
    scoring: ScoringParams,
    #[serde(default)]
    controversy: ControversySection,
    sectors: BTreeMap<String, RawSectorWeights>,
}

impl ScoringConfig {
    pub fn new(
        params: ScoringParams,
        tiers: TierBounds,
        sectors: SectorWeightsTable,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        tiers.validate()?;
        Ok(Self {
            scoring: params,
            controversy: ControversySection { tiers },
            sectors,
        })
    }

    /// Default tiers and sector seed with custom constants.
    pub fn with_params(params: ScoringParams) -> Result<Self, ConfigError> {
        Self::new(params, TierBounds::default(), SectorWeightsTable::default_seed())
    }

    pub fn params(&self) -> &ScoringParams {
        &self.scoring
    }

    pub fn tiers(&self) -> &TierBounds {
        &self.controversy.tiers
    }

    pub fn sectors(&self) -> &SectorWeightsTable {
        &self.sectors
    }

    /// Parse and validate a TOML document. `[sectors]` is mandatory.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawScoringConfig = toml::from_str(toml_str)?;
        let sectors = SectorWeightsTable::new(raw.sectors)?;
        Self::new(raw.scoring, raw.controversy.tiers, sectors)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the config the way the service does at startup:
    /// 1) $ESG_SCORING_CONFIG_PATH (must exist)
    /// 2) config/scoring.toml
    /// 3) built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(p) = std::env::var(ENV_SCORING_CONFIG_PATH) {
            let path = PathBuf::from(p);
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    var: ENV_SCORING_CONFIG_PATH,
                    path,
                });
            }
            let cfg = Self::from_path(&path)?;
            info!(path = %path.display(), sectors = cfg.sectors.len(), "scoring config loaded");
            return Ok(cfg);
        }

        let default_path = PathBuf::from(DEFAULT_SCORING_CONFIG_PATH);
        if default_path.exists() {
            let cfg = Self::from_path(&default_path)?;
            info!(path = %default_path.display(), sectors = cfg.sectors.len(), "scoring config loaded");
            return Ok(cfg);
        }

        info!("no scoring config file found; using built-in defaults");
        Ok(Self::default())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringParams::default(),
            controversy: ControversySection::default(),
            sectors: SectorWeightsTable::default_seed(),
        }
    }
}
