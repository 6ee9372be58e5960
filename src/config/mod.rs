// src/config/mod.rs
pub mod scoring;

pub use scoring::{
    ControversySection, ScoringConfig, ScoringParams, DEFAULT_SCORING_CONFIG_PATH,
    ENV_SCORING_CONFIG_PATH,
};
