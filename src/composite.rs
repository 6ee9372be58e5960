//! Composite aggregation of the three pillar scores.
//!
//! composite = (E*wE + S*wS + G*wG) / (wE + wS + wG), clamped to [0, 10].
//! Weights come straight from the sector table and need not sum to 1; `SectorWeights`
//! guarantees a positive, finite sum, so the division is always defined.

use crate::document::Pillar;
use crate::pillar::{SCORE_MAX, SCORE_MIN};
use crate::sector_weights::SectorWeights;

/// Pillar scores in fixed E, S, G order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PillarTriple {
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
}

impl PillarTriple {
    pub fn new(environmental: f64, social: f64, governance: f64) -> Self {
        Self {
            environmental,
            social,
            governance,
        }
    }

    pub fn get(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Environmental => self.environmental,
            Pillar::Social => self.social,
            Pillar::Governance => self.governance,
        }
    }
}

/// Sector-weighted mean of the pillar scores.
pub fn composite_score(scores: &PillarTriple, weights: &SectorWeights) -> f64 {
    // Normalize each weight first so huge (but finite) weights cannot overflow the products.
    let total = weights.sum();
    let mean: f64 = Pillar::ALL
        .iter()
        .map(|&p| scores.get(p) * (weights.get(p) / total))
        .sum();
    mean.clamp(SCORE_MIN, SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_scores_give_that_score() {
        let w = SectorWeights::new(0.2, 0.4, 0.4).unwrap();
        let c = composite_score(&PillarTriple::new(5.0, 5.0, 5.0), &w);
        assert!((c - 5.0).abs() < 1e-12);
    }

    #[test]
    fn unnormalized_weights_are_divided_by_their_sum() {
        let normalized = SectorWeights::new(0.5, 0.25, 0.25).unwrap();
        let scaled = SectorWeights::new(2.0, 1.0, 1.0).unwrap();
        let s = PillarTriple::new(8.0, 4.0, 2.0);
        let a = composite_score(&s, &normalized);
        let b = composite_score(&s, &scaled);
        assert!((a - 5.5).abs() < 1e-12);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_pillar_is_ignored() {
        let w = SectorWeights::new(1.0, 0.0, 0.0).unwrap();
        let c = composite_score(&PillarTriple::new(9.0, 0.0, 0.0), &w);
        assert!((c - 9.0).abs() < 1e-12);
    }

    #[test]
    fn huge_weights_do_not_overflow() {
        let w = SectorWeights::new(1e308, 0.0, 1e307).unwrap();
        let c = composite_score(&PillarTriple::new(5.0, 0.0, 5.0), &w);
        assert!((c - 5.0).abs() < 1e-9, "composite {c}");
    }

    #[test]
    fn stays_in_range_at_the_extremes() {
        let w = SectorWeights::new(0.33, 0.33, 0.34).unwrap();
        assert!(composite_score(&PillarTriple::new(10.0, 10.0, 10.0), &w) <= 10.0);
        assert!(composite_score(&PillarTriple::new(0.0, 0.0, 0.0), &w) >= 0.0);
    }
}
