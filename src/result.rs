//! result.rs: Output of one scoring run.
//!
//! Produced fresh per call; persistence and caching belong to the caller, keyed by
//! `(entity_id, as_of, fingerprint)`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::corpus::DocumentWarning;
use crate::document::Pillar;
use crate::explain::Explanation;
use crate::pillar::PillarScore;

/// Weights that produced the composite, echoed for auditability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedWeights {
    #[serde(rename = "E")]
    pub environmental: f64,
    #[serde(rename = "S")]
    pub social: f64,
    #[serde(rename = "G")]
    pub governance: f64,
}

/// Full score for one entity at one as-of date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub entity_id: String,
    pub as_of: NaiveDate,
    /// Sector as requested by the caller.
    pub sector: String,
    /// Sector table entry actually used (`default` on fallback).
    pub sector_used: String,
    pub weights: AppliedWeights,
    pub environmental: PillarScore,
    pub social: PillarScore,
    pub governance: PillarScore,
    pub composite: f64,
    pub explanation: Explanation,
    /// Valid, in-window documents for this entity (any pillar).
    pub documents_considered: usize,
    /// Documents excluded for invalid annotations.
    #[serde(default)]
    pub warnings: Vec<DocumentWarning>,
    /// SHA-256 of the document set that was scored.
    pub fingerprint: String,
}

impl ScoreResult {
    pub fn pillar(&self, pillar: Pillar) -> &PillarScore {
        match pillar {
            Pillar::Environmental => &self.environmental,
            Pillar::Social => &self.social,
            Pillar::Governance => &self.governance,
        }
    }

    /// True when no pillar had any usable evidence.
    pub fn is_unscored(&self) -> bool {
        Pillar::ALL
            .iter()
            .all(|&p| self.pillar(p).data_points_count == 0)
    }
}
