//! # Corpus Selection
//! Picks the documents that may influence a score: same entity, published within
//! `[as_of - lookback_window_days, as_of]`, annotations in range.
//!
//! Decay never widens this window; it only weights what is inside it. An empty
//! selection is a normal outcome, not an error.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::document::{Document, Pillar};
use crate::error::DocumentRejection;

/// What to select.
#[derive(Debug, Clone, Copy)]
pub struct CorpusQuery<'q> {
    pub entity_id: &'q str,
    /// `None` selects documents for every pillar.
    pub pillar: Option<Pillar>,
    pub as_of: NaiveDate,
    pub lookback_window_days: u32,
}

impl<'q> CorpusQuery<'q> {
    pub fn new(entity_id: &'q str, as_of: NaiveDate, lookback_window_days: u32) -> Self {
        Self {
            entity_id,
            pillar: None,
            as_of,
            lookback_window_days,
        }
    }

    pub fn pillar(mut self, pillar: Pillar) -> Self {
        self.pillar = Some(pillar);
        self
    }

    /// First day inside the window (inclusive).
    pub fn window_start(&self) -> NaiveDate {
        self.as_of
            .checked_sub_days(Days::new(u64::from(self.lookback_window_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn in_window(&self, published_at: NaiveDate) -> bool {
        published_at >= self.window_start() && published_at <= self.as_of
    }
}

/// A document that passed selection, with its position in the caller's input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedDocument<'a> {
    pub index: usize,
    pub document: &'a Document,
}

/// Non-fatal report of a document excluded for invalid annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentWarning {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub reason: DocumentRejection,
    pub message: String,
}

/// Valid, in-window documents for one entity, plus what was rejected on the way.
#[derive(Debug, Clone, Default)]
pub struct Corpus<'a> {
    pub selected: Vec<SelectedDocument<'a>>,
    pub warnings: Vec<DocumentWarning>,
}

impl<'a> Corpus<'a> {
    /// Entity and window filter first, then validation of what remains.
    pub fn prepare(documents: &'a [Document], query: &CorpusQuery<'_>) -> Self {
        let mut corpus = Corpus::default();
        for (index, document) in documents.iter().enumerate() {
            if document.entity_id != query.entity_id || !query.in_window(document.published_at)
            {
                continue;
            }
            if let Err(reason) = document.validate() {
                warn!(
                    target: "esg",
                    entity = query.entity_id,
                    index,
                    %reason,
                    "document rejected"
                );
                corpus.warnings.push(DocumentWarning {
                    index,
                    document_id: document.document_id.clone(),
                    message: reason.to_string(),
                    reason,
                });
                continue;
            }
            if let Some(p) = query.pillar {
                if !document.topic_relevance.is_relevant_to(p) {
                    continue;
                }
            }
            corpus.selected.push(SelectedDocument { index, document });
        }
        corpus
    }

    /// Selected documents with nonzero relevance for `pillar`.
    pub fn for_pillar(&self, pillar: Pillar) -> impl Iterator<Item = &SelectedDocument<'a>> {
        self.selected
            .iter()
            .filter(move |d| d.document.topic_relevance.is_relevant_to(pillar))
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// SHA-256 over the selected documents' annotations, in input order.
    /// Stable across runs; suitable as the document-set part of a cache key.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for sel in &self.selected {
            let d = sel.document;
            hasher.update(d.document_id.as_deref().unwrap_or("").as_bytes());
            hasher.update([0u8]);
            hasher.update(d.entity_id.as_bytes());
            hasher.update([0u8]);
            hasher.update(d.published_at.to_string().as_bytes());
            hasher.update(d.effective_sentiment().to_bits().to_le_bytes());
            for p in Pillar::ALL {
                hasher.update(d.topic_relevance.get(p).to_bits().to_le_bytes());
            }
            hasher.update(d.controversy_severity.to_bits().to_le_bytes());
            hasher.update(
                d.controversy_tier
                    .map(|t| t.label())
                    .unwrap_or("")
                    .as_bytes(),
            );
            hasher.update([0u8]);
            hasher.update(d.source_id.as_bytes());
            hasher.update([0xffu8]);
        }
        let digest = hasher.finalize();
        let mut out = String::with_capacity(64);
        for b in digest.iter() {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TopicRelevance;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn doc(entity: &str, published: NaiveDate) -> Document {
        Document::new(entity, published)
            .sentiment(0.2)
            .relevance(TopicRelevance::new(0.5, 0.0, 0.3))
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let as_of = day(2024, 12, 31);
        let q = CorpusQuery::new("TCS", as_of, 365);
        assert_eq!(q.window_start(), day(2024, 1, 1));

        let docs = vec![
            doc("TCS", day(2023, 12, 31)), // one day too old
            doc("TCS", day(2024, 1, 1)),
            doc("TCS", day(2024, 12, 31)),
            doc("TCS", day(2025, 1, 1)), // after as-of
        ];
        let c = Corpus::prepare(&docs, &q);
        let idx: Vec<usize> = c.selected.iter().map(|s| s.index).collect();
        assert_eq!(idx, vec![1, 2]);
        assert!(c.warnings.is_empty());
    }

    #[test]
    fn other_entities_are_ignored_silently() {
        let as_of = day(2024, 6, 1);
        let docs = vec![doc("WIPRO", as_of), doc("INFY", as_of)];
        let c = Corpus::prepare(&docs, &CorpusQuery::new("INFY", as_of, 365));
        assert_eq!(c.len(), 1);
        assert_eq!(c.selected[0].index, 1);
        assert!(c.warnings.is_empty());
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let c = Corpus::prepare(&[], &CorpusQuery::new("ONGC", day(2024, 6, 1), 365));
        assert!(c.is_empty());
        assert!(c.warnings.is_empty());
    }

    #[test]
    fn invalid_documents_become_warnings() {
        let as_of = day(2024, 6, 1);
        let docs = vec![
            doc("IOC", as_of).id("ok"),
            doc("IOC", as_of).id("bad").severity(12),
        ];
        let c = Corpus::prepare(&docs, &CorpusQuery::new("IOC", as_of, 365));
        assert_eq!(c.len(), 1);
        assert_eq!(c.warnings.len(), 1);
        let w = &c.warnings[0];
        assert_eq!(w.index, 1);
        assert_eq!(w.document_id.as_deref(), Some("bad"));
        assert!(matches!(
            w.reason,
            DocumentRejection::SeverityOutOfRange { value } if value == 12.0
        ));
    }

    #[test]
    fn pillar_query_keeps_only_relevant_documents() {
        let as_of = day(2024, 6, 1);
        let docs = vec![
            doc("BPCL", as_of),
            Document::new("BPCL", as_of).relevance(TopicRelevance::only(Pillar::Social, 1.0)),
        ];
        let q = CorpusQuery::new("BPCL", as_of, 365).pillar(Pillar::Social);
        let c = Corpus::prepare(&docs, &q);
        assert_eq!(c.len(), 1);
        assert_eq!(c.selected[0].index, 1);

        let all = Corpus::prepare(&docs, &CorpusQuery::new("BPCL", as_of, 365));
        assert_eq!(all.for_pillar(Pillar::Environmental).count(), 1);
        assert_eq!(all.for_pillar(Pillar::Governance).count(), 1);
        assert_eq!(all.for_pillar(Pillar::Social).count(), 1);
    }

    #[test]
    fn fingerprint_tracks_content_and_order() {
        let as_of = day(2024, 6, 1);
        let q = CorpusQuery::new("CIPLA", as_of, 365);
        let a = vec![doc("CIPLA", as_of).id("1"), doc("CIPLA", as_of).id("2")];
        let b = vec![doc("CIPLA", as_of).id("2"), doc("CIPLA", as_of).id("1")];

        let fa = Corpus::prepare(&a, &q).fingerprint();
        assert_eq!(fa.len(), 64);
        assert_eq!(fa, Corpus::prepare(&a, &q).fingerprint());
        assert_ne!(fa, Corpus::prepare(&b, &q).fingerprint());

        let mut changed = a.clone();
        changed[0].sentiment = Some(0.3);
        assert_ne!(fa, Corpus::prepare(&changed, &q).fingerprint());
    }
}
