//! # Time Decay
//! Recency weight for a document relative to the as-of date:
//! `decay_factor ^ (age_days / reference_period_days)`.
//!
//! A document exactly one reference period old weighs `decay_factor`; a document published
//! on the as-of date weighs 1.0. Age is always measured against the as-of date, never the
//! wall clock, so recomputing a historical score gives the same number.

use chrono::NaiveDate;

use crate::config::ScoringParams;

/// Exponential recency model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDecay {
    factor: f64,
    reference_period_days: f64,
}

impl TimeDecay {
    pub fn new(factor: f64, reference_period_days: f64) -> Self {
        Self {
            factor,
            reference_period_days,
        }
    }

    pub fn from_params(params: &ScoringParams) -> Self {
        Self::new(params.decay_factor, params.reference_period_days)
    }

    /// Weight for a given age; negative ages count as zero.
    pub fn weight(&self, age_days: f64) -> f64 {
        let age = age_days.max(0.0);
        self.factor.powf(age / self.reference_period_days)
    }

    pub fn weight_between(&self, published_at: NaiveDate, as_of: NaiveDate) -> f64 {
        self.weight(age_days(published_at, as_of))
    }
}

/// Whole calendar days from `published_at` to `as_of`, clamped to >= 0.
pub fn age_days(published_at: NaiveDate, as_of: NaiveDate) -> f64 {
    (as_of - published_at).num_days().max(0) as f64
}
