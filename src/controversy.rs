//! # Controversy Penalty
//! Turns controversy severity into a subtractive score penalty.
//!
//! Per document: `severity * penalty_scale * decay`. Penalties within a pillar are
//! summed (controversies compound) and subtracted once, after the sentiment average.
//!
//! Tiers are display metadata for explanations. The ingestion layer's tier wins when a
//! document carries one; otherwise severity is mapped through `TierBounds`, which should
//! mirror the bands the ingestion classifier is configured with.

use serde::{Deserialize, Serialize};

use crate::document::{Document, SeverityTier};
use crate::error::ConfigError;

/// Lower severity bounds of each tier above `minor` (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierBounds {
    pub moderate: u8,
    pub severe: u8,
    pub critical: u8,
}

impl Default for TierBounds {
    fn default() -> Self {
        Self {
            moderate: 4,
            severe: 7,
            critical: 9,
        }
    }
}

impl TierBounds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 1 <= self.moderate
            && self.moderate < self.severe
            && self.severe < self.critical
            && self.critical <= 10;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::InvalidTierBounds {
                moderate: self.moderate,
                severe: self.severe,
                critical: self.critical,
            })
        }
    }

    /// Tier for a raw severity; `None` for no controversy.
    pub fn classify(&self, severity: i32) -> Option<SeverityTier> {
        if severity <= 0 {
            None
        } else if severity >= i32::from(self.critical) {
            Some(SeverityTier::Critical)
        } else if severity >= i32::from(self.severe) {
            Some(SeverityTier::Severe)
        } else if severity >= i32::from(self.moderate) {
            Some(SeverityTier::Moderate)
        } else {
            Some(SeverityTier::Minor)
        }
    }

    /// Tier used for explanations: pass-through first, configured bands second.
    pub fn tier_for(&self, doc: &Document) -> Option<SeverityTier> {
        if !doc.has_controversy() {
            return None;
        }
        doc.controversy_tier
            .or_else(|| self.classify(doc.severity_level()))
    }
}

/// `severity * scale`, scaled again by recency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyModel {
    scale: f64,
}

impl PenaltyModel {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn penalty(&self, severity: i32, recency_weight: f64) -> f64 {
        f64::from(severity.max(0)) * self.scale * recency_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_bands() {
        let t = TierBounds::default();
        assert_eq!(t.classify(0), None);
        assert_eq!(t.classify(1), Some(SeverityTier::Minor));
        assert_eq!(t.classify(3), Some(SeverityTier::Minor));
        assert_eq!(t.classify(4), Some(SeverityTier::Moderate));
        assert_eq!(t.classify(7), Some(SeverityTier::Severe));
        assert_eq!(t.classify(9), Some(SeverityTier::Critical));
        assert_eq!(t.classify(10), Some(SeverityTier::Critical));
    }

    #[test]
    fn ingestion_tier_is_passed_through() {
        let t = TierBounds::default();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let doc = Document::new("SBIN", day)
            .severity(5)
            .tier(SeverityTier::Critical);
        assert_eq!(t.tier_for(&doc), Some(SeverityTier::Critical));

        // no controversy, no tier, whatever the metadata says
        let quiet = Document::new("SBIN", day).tier(SeverityTier::Severe);
        assert_eq!(t.tier_for(&quiet), None);
    }

    #[test]
    fn bounds_must_be_strictly_ordered() {
        assert!(TierBounds::default().validate().is_ok());
        let bad = TierBounds {
            moderate: 5,
            severe: 5,
            critical: 9,
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidTierBounds { .. })
        ));
        let zero = TierBounds {
            moderate: 0,
            ..TierBounds::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn penalty_scales_with_severity_and_recency() {
        let m = PenaltyModel::new(0.5);
        assert_eq!(m.penalty(10, 1.0), 5.0);
        assert_eq!(m.penalty(4, 0.5), 1.0);
        assert_eq!(m.penalty(0, 1.0), 0.0);
        assert!(m.penalty(6, 0.9) < m.penalty(6, 1.0));
    }
}
