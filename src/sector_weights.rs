//! # Sector Weights
//!
//! Maps an entity's sector to the E/S/G weights used by the composite score.
//!
//! - Exact, case-sensitive lookup. Normalizing sector strings is the ingestion
//!   layer's job; "IT Services" does not match "IT".
//! - Fallback order: exact match → `default`.
//! - The `default` entry is mandatory and checked when the table is built, so
//!   resolving never fails at request time.
//! - Triples need not sum to 1; the composite divides by the actual sum.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::Pillar;
use crate::error::ConfigError;

pub const DEFAULT_SECTOR: &str = "default";

/// Non-negative pillar weights with a positive sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorWeights {
    #[serde(rename = "E")]
    environmental: f64,
    #[serde(rename = "S")]
    social: f64,
    #[serde(rename = "G")]
    governance: f64,
}

impl SectorWeights {
    pub fn new(environmental: f64, social: f64, governance: f64) -> Result<Self, ConfigError> {
        Self::for_sector("custom", environmental, social, governance)
    }

    fn for_sector(
        sector: &str,
        environmental: f64,
        social: f64,
        governance: f64,
    ) -> Result<Self, ConfigError> {
        let w = Self {
            environmental,
            social,
            governance,
        };
        for pillar in Pillar::ALL {
            let value = w.get(pillar);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSectorWeight {
                    sector: sector.to_string(),
                    pillar,
                    value,
                });
            }
        }
        let sum = w.sum();
        if sum <= 0.0 {
            return Err(ConfigError::NonPositiveWeightSum {
                sector: sector.to_string(),
                sum,
            });
        }
        if !sum.is_finite() {
            return Err(ConfigError::WeightSumOverflow {
                sector: sector.to_string(),
            });
        }
        Ok(w)
    }

    pub fn get(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Environmental => self.environmental,
            Pillar::Social => self.social,
            Pillar::Governance => self.governance,
        }
    }

    pub fn sum(&self) -> f64 {
        self.environmental + self.social + self.governance
    }
}

/// Raw `{E, S, G}` triple as written in config files.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawSectorWeights {
    #[serde(rename = "E", alias = "environmental", default)]
    pub environmental: f64,
    #[serde(rename = "S", alias = "social", default)]
    pub social: f64,
    #[serde(rename = "G", alias = "governance", default)]
    pub governance: f64,
}

/// Validated sector → weights table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SectorWeightsTable {
    entries: BTreeMap<String, SectorWeights>,
}

/// Outcome of a lookup: which entry was used and whether it was the fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSector<'a> {
    pub name: &'a str,
    pub weights: SectorWeights,
    pub fallback: bool,
}

impl SectorWeightsTable {
    /// Validate every triple and require a `default` entry.
    pub fn new(raw: BTreeMap<String, RawSectorWeights>) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for (sector, w) in raw {
            let weights =
                SectorWeights::for_sector(&sector, w.environmental, w.social, w.governance)?;
            entries.insert(sector, weights);
        }
        if !entries.contains_key(DEFAULT_SECTOR) {
            return Err(ConfigError::MissingDefaultSector);
        }
        Ok(Self { entries })
    }

    /// Built-in table with the sectors the platform launched with.
    pub fn default_seed() -> Self {
        let mut entries = BTreeMap::new();
        for (sector, environmental, social, governance) in [
            ("Banking", 0.2, 0.4, 0.4),
            ("Oil & Gas", 0.5, 0.3, 0.2),
            ("IT", 0.3, 0.4, 0.3),
            (DEFAULT_SECTOR, 0.33, 0.33, 0.34),
        ] {
            entries.insert(
                sector.to_string(),
                SectorWeights {
                    environmental,
                    social,
                    governance,
                },
            );
        }
        Self { entries }
    }

    /// Exact lookup with `default` fallback.
    pub fn resolve(&self, sector: &str) -> ResolvedSector<'_> {
        if let Some((name, &weights)) = self.entries.get_key_value(sector) {
            return ResolvedSector {
                name: name.as_str(),
                weights,
                fallback: false,
            };
        }
        ResolvedSector {
            name: DEFAULT_SECTOR,
            weights: self.default_weights(),
            fallback: true,
        }
    }

    pub fn default_weights(&self) -> SectorWeights {
        // presence checked in `new`
        self.entries[DEFAULT_SECTOR]
    }

    pub fn sectors(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SectorWeightsTable {
    fn default() -> Self {
        Self::default_seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(e: f64, s: f64, g: f64) -> RawSectorWeights {
        RawSectorWeights {
            environmental: e,
            social: s,
            governance: g,
        }
    }

    #[test]
    fn exact_match() {
        let t = SectorWeightsTable::default_seed();
        let r = t.resolve("Oil & Gas");
        assert_eq!(r.name, "Oil & Gas");
        assert!(!r.fallback);
        assert!((r.weights.get(Pillar::Environmental) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn miss_falls_back_to_default() {
        let t = SectorWeightsTable::default_seed();
        let r = t.resolve("Pharmaceuticals");
        assert_eq!(r.name, DEFAULT_SECTOR);
        assert!(r.fallback);
        assert_eq!(r.weights, t.default_weights());
    }

    #[test]
    fn lookup_is_not_fuzzy() {
        let t = SectorWeightsTable::default_seed();
        assert!(t.resolve("banking").fallback);
        assert!(t.resolve("IT Services").fallback);
        assert!(t.resolve(" Banking").fallback);
    }

    #[test]
    fn explicit_default_is_not_a_fallback() {
        let t = SectorWeightsTable::default_seed();
        let r = t.resolve(DEFAULT_SECTOR);
        assert!(!r.fallback);
        assert_eq!(r.weights, t.default_weights());
    }

    #[test]
    fn missing_default_is_rejected() {
        let mut m = BTreeMap::new();
        m.insert("Banking".to_string(), raw(0.2, 0.4, 0.4));
        assert!(matches!(
            SectorWeightsTable::new(m),
            Err(ConfigError::MissingDefaultSector)
        ));
    }

    #[test]
    fn zero_or_negative_triples_are_rejected() {
        let mut m = BTreeMap::new();
        m.insert(DEFAULT_SECTOR.to_string(), raw(0.0, 0.0, 0.0));
        assert!(matches!(
            SectorWeightsTable::new(m),
            Err(ConfigError::NonPositiveWeightSum { .. })
        ));

        let mut m = BTreeMap::new();
        m.insert(DEFAULT_SECTOR.to_string(), raw(0.5, -0.1, 0.6));
        assert!(matches!(
            SectorWeightsTable::new(m),
            Err(ConfigError::InvalidSectorWeight {
                pillar: Pillar::Social,
                ..
            })
        ));
    }

    #[test]
    fn overflowing_sum_is_rejected() {
        let mut m = BTreeMap::new();
        m.insert(DEFAULT_SECTOR.to_string(), raw(1e308, 1e308, 0.0));
        assert!(matches!(
            SectorWeightsTable::new(m),
            Err(ConfigError::WeightSumOverflow { ref sector }) if sector == DEFAULT_SECTOR
        ));
        assert!(SectorWeights::new(f64::MAX, f64::MAX, f64::MAX).is_err());
    }

    #[test]
    fn unnormalized_triples_are_accepted() {
        let mut m = BTreeMap::new();
        m.insert(DEFAULT_SECTOR.to_string(), raw(2.0, 1.0, 1.0));
        m.insert("Utilities".to_string(), raw(1.0, 0.0, 0.0));
        let t = SectorWeightsTable::new(m).unwrap();
        assert_eq!(t.len(), 2);
        assert!((t.resolve("Utilities").weights.sum() - 1.0).abs() < 1e-12);
    }
}
