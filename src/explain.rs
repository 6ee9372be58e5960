//! explain.rs: Auditable decomposition of each pillar score.
//!
//! The builder re-derives the per-document contributions the calculator used and splits
//! the pre-clamp score into cause classes:
//!
//!   pre_clamp = midpoint                         (baseline)
//!             + Σ_{impact>5} w_i (impact_i - 5) / W  (positive sentiment)
//!             + Σ_{impact<5} w_i (impact_i - 5) / W  (negative sentiment)
//!             - Σ_tier penalty                        (one entry per severity tier)
//!
//! Factors below the display threshold move to `below_threshold`; they are never dropped,
//! so `factors + below_threshold` always adds back up to `pre_clamp_score`.

use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::document::{Pillar, SeverityTier};
use crate::pillar::{Contribution, PillarCalculator, PillarScore, SENTIMENT_MIDPOINT};

/// Cause class of a factor. Ordering doubles as the tie-break for equal impacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactorKind {
    Baseline,
    PositiveSentiment,
    NegativeSentiment,
    Controversy { tier: SeverityTier },
}

/// One line of an explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    #[serde(flatten)]
    pub kind: FactorKind,
    pub description: String,
    /// Signed contribution on the 0–10 scale.
    pub impact: f64,
    /// `impact` with explicit sign and two decimals, e.g. "+1.25".
    pub impact_label: String,
    /// Documents behind this factor.
    pub documents: usize,
}

impl Factor {
    pub fn new(kind: FactorKind, description: impl Into<String>, impact: f64) -> Self {
        Self {
            kind,
            description: description.into(),
            impact,
            impact_label: signed(impact),
            documents: 0,
        }
    }

    pub fn documents(mut self, n: usize) -> Self {
        self.documents = n;
        self
    }
}

/// Explanation of one pillar score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarExplanation {
    pub pillar: Pillar,
    pub score: f64,
    pub pre_clamp_score: f64,
    pub document_count: usize,
    pub controversy_count: usize,
    /// Displayed factors, largest |impact| first.
    pub factors: Vec<Factor>,
    /// Factors under the display threshold; still part of the sum.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub below_threshold: Vec<Factor>,
}

impl PillarExplanation {
    /// Sum of every factor, displayed or not.
    pub fn reconstructed_score(&self) -> f64 {
        self.factors
            .iter()
            .chain(self.below_threshold.iter())
            .map(|f| f.impact)
            .sum()
    }
}

/// Explanations for all three pillars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub environmental: PillarExplanation,
    pub social: PillarExplanation,
    pub governance: PillarExplanation,
}

impl Explanation {
    pub fn pillar(&self, pillar: Pillar) -> &PillarExplanation {
        match pillar {
            Pillar::Environmental => &self.environmental,
            Pillar::Social => &self.social,
            Pillar::Governance => &self.governance,
        }
    }
}

/// Builds explanations from the same inputs the calculator saw.
#[derive(Debug, Clone, Copy)]
pub struct ExplanationBuilder<'c> {
    calculator: PillarCalculator<'c>,
}

impl<'c> ExplanationBuilder<'c> {
    pub fn new(calculator: PillarCalculator<'c>) -> Self {
        Self { calculator }
    }

    pub fn explain(&self, pillar: Pillar, corpus: &Corpus<'_>, score: &PillarScore) -> PillarExplanation {
        let params = self.calculator.config().params();
        let contributions = self.calculator.contributions(pillar, corpus);

        let mut all = Vec::new();
        if contributions.is_empty() {
            all.push(Factor::new(
                FactorKind::Baseline,
                format!("No {} evidence in window; neutral baseline", pillar.label()),
                params.neutral_baseline,
            ));
        } else {
            let weight_sum: f64 = contributions.iter().map(|c| c.weight).sum();
            if weight_sum > 0.0 {
                all.push(
                    Factor::new(
                        FactorKind::Baseline,
                        "Sentiment midpoint (neutral coverage)",
                        SENTIMENT_MIDPOINT,
                    )
                    .documents(contributions.len()),
                );
                all.extend(sentiment_factor(&contributions, weight_sum, true));
                all.extend(sentiment_factor(&contributions, weight_sum, false));
            } else {
                all.push(
                    Factor::new(
                        FactorKind::Baseline,
                        "All evidence fully decayed; neutral baseline",
                        params.neutral_baseline,
                    )
                    .documents(contributions.len()),
                );
            }
            for tier in SeverityTier::ALL {
                all.extend(controversy_factor(&contributions, tier));
            }
        }

        sort_by_impact(&mut all);
        let threshold = params.explanation_impact_threshold;
        let (factors, below_threshold): (Vec<Factor>, Vec<Factor>) =
            all.into_iter().partition(|f| f.impact.abs() >= threshold);

        PillarExplanation {
            pillar,
            score: score.score,
            pre_clamp_score: score.pre_clamp_score,
            document_count: contributions.len(),
            controversy_count: contributions
                .iter()
                .filter(|c| c.selected.document.has_controversy())
                .count(),
            factors,
            below_threshold,
        }
    }
}

fn sentiment_factor(contributions: &[Contribution<'_>], weight_sum: f64, positive: bool) -> Option<Factor> {
    let mut lifts: Vec<(f64, &str)> = contributions
        .iter()
        .filter_map(|c| {
            let delta = c.sentiment_impact - SENTIMENT_MIDPOINT;
            let keep = if positive { delta > 0.0 } else { delta < 0.0 };
            keep.then(|| (c.weight * delta / weight_sum, c.selected.document.source_id.as_str()))
        })
        .collect();
    if lifts.is_empty() {
        return None;
    }

    let impact: f64 = lifts.iter().map(|(v, _)| *v).sum();
    let n = lifts.len();

    lifts.sort_by(|a, b| b.0.abs().total_cmp(&a.0.abs()));
    let mut sources: Vec<&str> = Vec::new();
    for &(_, s) in &lifts {
        if !s.is_empty() && !sources.contains(&s) {
            sources.push(s);
        }
        if sources.len() == 3 {
            break;
        }
    }

    let (kind, tone) = if positive {
        (FactorKind::PositiveSentiment, "Positive")
    } else {
        (FactorKind::NegativeSentiment, "Negative")
    };
    let mut description = format!("{tone} coverage in {n} {}", plural(n, "document"));
    if !sources.is_empty() {
        description.push_str(&format!(" ({})", sources.join(", ")));
    }
    Some(Factor::new(kind, description, impact).documents(n))
}

fn controversy_factor(contributions: &[Contribution<'_>], tier: SeverityTier) -> Option<Factor> {
    let hits: Vec<&Contribution<'_>> = contributions
        .iter()
        .filter(|c| c.selected.document.has_controversy() && c.tier == Some(tier))
        .collect();
    if hits.is_empty() {
        return None;
    }
    let penalty: f64 = hits.iter().map(|c| c.penalty).sum();
    let max_severity = hits
        .iter()
        .map(|c| c.selected.document.severity_level())
        .max()
        .unwrap_or(0);
    let n = hits.len();
    Some(
        Factor::new(
            FactorKind::Controversy { tier },
            format!(
                "{} controversy: {n} {} (max severity {max_severity})",
                capitalize(tier.label()),
                plural(n, "document"),
            ),
            -penalty,
        )
        .documents(n),
    )
}

fn sort_by_impact(factors: &mut [Factor]) {
    factors.sort_by(|a, b| {
        b.impact
            .abs()
            .total_cmp(&a.impact.abs())
            .then_with(|| a.kind.cmp(&b.kind))
    });
}

/// "+1.25" / "-0.40"
pub fn signed(x: f64) -> String {
    if x >= 0.0 {
        format!("+{x:.2}")
    } else {
        format!("{x:.2}")
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
