//! # Scoring Engine
//! Pure, deterministic mapping `(documents, sector, as_of, config)` → `ScoreResult`.
//! No I/O, no clock, no shared state: identical inputs give bit-identical output, and
//! independent entities can be scored in parallel without coordination.
//!
//! Pipeline: corpus selection → per-pillar scores (decay, relevance, penalty) →
//! sector weights → composite → explanation rebuilt from the same contributions.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::composite::{composite_score, PillarTriple};
use crate::config::ScoringConfig;
use crate::corpus::{Corpus, CorpusQuery};
use crate::document::{Document, Pillar};
use crate::explain::{Explanation, ExplanationBuilder};
use crate::pillar::PillarCalculator;
use crate::result::{AppliedWeights, ScoreResult};

/// Score one entity as of `as_of`. Never fails for a validated config; bad documents
/// become `warnings`, sparse data becomes neutral baselines.
pub fn compute_score(
    entity_id: &str,
    as_of: NaiveDate,
    sector: &str,
    documents: &[Document],
    config: &ScoringConfig,
) -> ScoreResult {
    // 1) Corpus: entity + window + validation
    let query = CorpusQuery::new(entity_id, as_of, config.params().lookback_window_days);
    let corpus = Corpus::prepare(documents, &query);
    debug!(
        target: "esg",
        entity = entity_id,
        %as_of,
        supplied = documents.len(),
        selected = corpus.len(),
        rejected = corpus.warnings.len(),
        "corpus prepared"
    );

    // 2) Pillar scores
    let calculator = PillarCalculator::new(config, as_of);
    let environmental = calculator.score(Pillar::Environmental, &corpus);
    let social = calculator.score(Pillar::Social, &corpus);
    let governance = calculator.score(Pillar::Governance, &corpus);

    // 3) Sector weights + composite
    let resolved = config.sectors().resolve(sector);
    if resolved.fallback {
        debug!(target: "esg", sector, "sector not configured; using default weights");
    }
    let triple = PillarTriple::new(environmental.score, social.score, governance.score);
    let composite = composite_score(&triple, &resolved.weights);

    // 4) Explanation re-derived from the same corpus
    let builder = ExplanationBuilder::new(calculator);
    let explanation = Explanation {
        environmental: builder.explain(Pillar::Environmental, &corpus, &environmental),
        social: builder.explain(Pillar::Social, &corpus, &social),
        governance: builder.explain(Pillar::Governance, &corpus, &governance),
    };

    info!(
        target: "esg",
        entity = entity_id,
        %as_of,
        sector_used = resolved.name,
        e = environmental.score,
        s = social.score,
        g = governance.score,
        composite,
        "score computed"
    );

    ScoreResult {
        entity_id: entity_id.to_string(),
        as_of,
        sector: sector.to_string(),
        sector_used: resolved.name.to_string(),
        weights: AppliedWeights {
            environmental: resolved.weights.get(Pillar::Environmental),
            social: resolved.weights.get(Pillar::Social),
            governance: resolved.weights.get(Pillar::Governance),
        },
        documents_considered: corpus.len(),
        fingerprint: corpus.fingerprint(),
        warnings: corpus.warnings,
        environmental,
        social,
        governance,
        composite,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TopicRelevance;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_documents_is_neutral_everywhere() {
        let cfg = ScoringConfig::default();
        let r = compute_score("TCS", day(2024, 6, 30), "IT", &[], &cfg);
        for p in Pillar::ALL {
            assert_eq!(r.pillar(p).score, 5.0);
            assert_eq!(r.pillar(p).data_points_count, 0);
        }
        assert!((r.composite - 5.0).abs() < 1e-12);
        assert!(r.is_unscored());
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn warnings_do_not_abort_scoring() {
        let cfg = ScoringConfig::default();
        let as_of = day(2024, 6, 30);
        let docs = vec![
            Document::new("TCS", as_of)
                .sentiment(2.0)
                .relevance(TopicRelevance::only(Pillar::Social, 1.0)),
            Document::new("TCS", as_of)
                .sentiment(1.0)
                .relevance(TopicRelevance::only(Pillar::Social, 1.0)),
        ];
        let r = compute_score("TCS", as_of, "IT", &docs, &cfg);
        assert_eq!(r.warnings.len(), 1);
        assert_eq!(r.warnings[0].index, 0);
        assert_eq!(r.social.data_points_count, 1);
        assert_eq!(r.social.score, 10.0);
    }

    #[test]
    fn result_echoes_sector_resolution() {
        let cfg = ScoringConfig::default();
        let r = compute_score("ONGC", day(2024, 6, 30), "Oil & Gas", &[], &cfg);
        assert_eq!(r.sector_used, "Oil & Gas");
        assert_eq!(r.weights.environmental, 0.5);

        let r = compute_score("SUNPHARMA", day(2024, 6, 30), "Pharmaceuticals", &[], &cfg);
        assert_eq!(r.sector, "Pharmaceuticals");
        assert_eq!(r.sector_used, "default");
    }
}
