//! # Pillar Scores
//! Collapses a pillar's evidence into one bounded 0–10 score.
//!
//! For documents with nonzero relevance to the pillar:
//!   w_i      = relevance_i * decay(age_i)
//!   raw      = Σ w_i * impact_i / Σ w_i          (impact_i = (sentiment_i + 1) * 5)
//!   penalty  = Σ severity_i * penalty_scale * decay(age_i)
//!   score    = clamp(raw - penalty, 0, 10)
//!
//! No relevant documents → neutral baseline. All weight decayed away → neutral baseline
//! minus whatever (equally decayed) penalty remains.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::controversy::PenaltyModel;
use crate::corpus::{Corpus, SelectedDocument};
use crate::decay::{age_days, TimeDecay};
use crate::document::{Pillar, SeverityTier};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;
/// Score of a perfectly neutral (sentiment 0) document.
pub const SENTIMENT_MIDPOINT: f64 = 5.0;

/// A document that entered a pillar's average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Position in the caller's input.
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub source_id: String,
    pub published_at: NaiveDate,
    /// relevance × decay
    pub weight: f64,
}

/// Final score for one pillar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    pub pillar: Pillar,
    pub score: f64,
    /// Score before clamping to [0, 10]; what the explanation reconstructs.
    pub pre_clamp_score: f64,
    /// Documents with nonzero relevance, including fully decayed ones.
    pub data_points_count: usize,
    pub documents: Vec<DocumentRef>,
}

/// Per-document inputs to a pillar score, shared with the explanation builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution<'a> {
    pub selected: SelectedDocument<'a>,
    pub weight: f64,
    pub sentiment_impact: f64,
    pub penalty: f64,
    pub tier: Option<SeverityTier>,
}

/// Pillar calculator bound to one config and as-of date.
#[derive(Debug, Clone, Copy)]
pub struct PillarCalculator<'c> {
    config: &'c ScoringConfig,
    as_of: NaiveDate,
    decay: TimeDecay,
    penalty: PenaltyModel,
}

impl<'c> PillarCalculator<'c> {
    pub fn new(config: &'c ScoringConfig, as_of: NaiveDate) -> Self {
        let params = config.params();
        Self {
            config,
            as_of,
            decay: TimeDecay::from_params(params),
            penalty: PenaltyModel::new(params.penalty_scale),
        }
    }

    pub fn config(&self) -> &'c ScoringConfig {
        self.config
    }

    /// One entry per document relevant to `pillar`, in input order.
    pub fn contributions<'a>(&self, pillar: Pillar, corpus: &Corpus<'a>) -> Vec<Contribution<'a>> {
        corpus
            .for_pillar(pillar)
            .map(|sel| {
                let doc = sel.document;
                let recency = self.decay.weight(age_days(doc.published_at, self.as_of));
                Contribution {
                    selected: *sel,
                    weight: doc.topic_relevance.get(pillar) * recency,
                    sentiment_impact: doc.sentiment_impact(),
                    penalty: self.penalty.penalty(doc.severity_level(), recency),
                    tier: self.config.tiers().tier_for(doc),
                }
            })
            .collect()
    }

    pub fn score(&self, pillar: Pillar, corpus: &Corpus<'_>) -> PillarScore {
        let contributions = self.contributions(pillar, corpus);
        let baseline = self.config.params().neutral_baseline;

        if contributions.is_empty() {
            debug!(target: "esg", %pillar, "no relevant documents; neutral baseline");
            return PillarScore {
                pillar,
                score: baseline,
                pre_clamp_score: baseline,
                data_points_count: 0,
                documents: Vec::new(),
            };
        }

        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        let mut total_penalty = 0.0;
        for c in &contributions {
            weighted_sum += c.weight * c.sentiment_impact;
            weight_sum += c.weight;
            if c.selected.document.has_controversy() {
                total_penalty += c.penalty;
            }
        }

        let raw_score = if weight_sum > 0.0 {
            weighted_sum / weight_sum
        } else {
            baseline
        };
        let pre_clamp_score = raw_score - total_penalty;
        let score = pre_clamp_score.clamp(SCORE_MIN, SCORE_MAX);

        debug!(
            target: "esg",
            %pillar,
            documents = contributions.len(),
            raw_score,
            total_penalty,
            score,
            "pillar scored"
        );

        PillarScore {
            pillar,
            score,
            pre_clamp_score,
            data_points_count: contributions.len(),
            documents: contributions
                .iter()
                .map(|c| DocumentRef {
                    index: c.selected.index,
                    document_id: c.selected.document.document_id.clone(),
                    source_id: c.selected.document.source_id.clone(),
                    published_at: c.selected.document.published_at,
                    weight: c.weight,
                })
                .collect(),
        }
    }
}
