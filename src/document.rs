//! # Documents
//! Annotated units of evidence handed to the engine by the ingestion layer.
//!
//! A `Document` arrives already classified: sentiment in [-1, 1], per-pillar topic
//! relevance in [0, 1] and a controversy severity in 0..=10. The engine never looks at
//! text; it only checks that the annotations are in range (`validate`) and reads them.
//!
//! Sentiment is lenient on input. Missing, `null`, non-numeric or non-finite values
//! become neutral (0.0) and the document still counts as a data point.
//!
//! Severity is read as a raw number so that a bad value (12.5, 1e11, "high") rejects
//! only its own document in `validate` instead of failing the whole request body.

use std::fmt;

use chrono::NaiveDate;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::error::DocumentRejection;

/// The three fixed ESG pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pillar {
    #[serde(rename = "E", alias = "environmental")]
    Environmental,
    #[serde(rename = "S", alias = "social")]
    Social,
    #[serde(rename = "G", alias = "governance")]
    Governance,
}

impl Pillar {
    pub const ALL: [Pillar; 3] = [Pillar::Environmental, Pillar::Social, Pillar::Governance];

    /// Short code used in configs and payloads.
    pub fn code(self) -> &'static str {
        match self {
            Pillar::Environmental => "E",
            Pillar::Social => "S",
            Pillar::Governance => "G",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pillar::Environmental => "Environmental",
            Pillar::Social => "Social",
            Pillar::Governance => "Governance",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-pillar relevance weights. Absent keys mean "not about this pillar".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicRelevance {
    #[serde(rename = "E", alias = "environmental", default)]
    pub environmental: f64,
    #[serde(rename = "S", alias = "social", default)]
    pub social: f64,
    #[serde(rename = "G", alias = "governance", default)]
    pub governance: f64,
}

impl TopicRelevance {
    pub fn new(environmental: f64, social: f64, governance: f64) -> Self {
        Self {
            environmental,
            social,
            governance,
        }
    }

    /// Relevance to exactly one pillar.
    pub fn only(pillar: Pillar, weight: f64) -> Self {
        let mut t = Self::default();
        *t.get_mut(pillar) = weight;
        t
    }

    pub fn get(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Environmental => self.environmental,
            Pillar::Social => self.social,
            Pillar::Governance => self.governance,
        }
    }

    fn get_mut(&mut self, pillar: Pillar) -> &mut f64 {
        match pillar {
            Pillar::Environmental => &mut self.environmental,
            Pillar::Social => &mut self.social,
            Pillar::Governance => &mut self.governance,
        }
    }

    pub fn is_relevant_to(&self, pillar: Pillar) -> bool {
        self.get(pillar) > 0.0
    }
}

/// Severity bands assigned by the ingestion layer's controversy classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Minor,
    Moderate,
    Severe,
    Critical,
}

impl SeverityTier {
    pub const ALL: [SeverityTier; 4] = [
        SeverityTier::Minor,
        SeverityTier::Moderate,
        SeverityTier::Severe,
        SeverityTier::Critical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SeverityTier::Minor => "minor",
            SeverityTier::Moderate => "moderate",
            SeverityTier::Severe => "severe",
            SeverityTier::Critical => "critical",
        }
    }
}

/// One annotated piece of evidence about an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Optional upstream identifier, echoed back in document references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub entity_id: String,
    pub published_at: NaiveDate,
    /// `None` means missing or unparseable; treated as neutral.
    #[serde(default, deserialize_with = "lenient_sentiment")]
    pub sentiment: Option<f64>,
    #[serde(default)]
    pub topic_relevance: TopicRelevance,
    /// Raw annotation; must be an integer in 0..=10 to pass `validate`.
    #[serde(default, deserialize_with = "lenient_severity")]
    pub controversy_severity: f64,
    /// Tier the ingestion layer assigned, passed through for explanations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controversy_tier: Option<SeverityTier>,
    /// Provenance tag; display only.
    #[serde(default)]
    pub source_id: String,
}

impl Document {
    /// Neutral, irrelevant document; refine with the builder methods.
    pub fn new(entity_id: impl Into<String>, published_at: NaiveDate) -> Self {
        Self {
            document_id: None,
            entity_id: entity_id.into(),
            published_at,
            sentiment: None,
            topic_relevance: TopicRelevance::default(),
            controversy_severity: 0.0,
            controversy_tier: None,
            source_id: String::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    pub fn sentiment(mut self, sentiment: f64) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn relevance(mut self, relevance: TopicRelevance) -> Self {
        self.topic_relevance = relevance;
        self
    }

    pub fn severity(mut self, severity: i32) -> Self {
        self.controversy_severity = f64::from(severity);
        self
    }

    pub fn tier(mut self, tier: SeverityTier) -> Self {
        self.controversy_tier = Some(tier);
        self
    }

    pub fn source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Sentiment used for scoring: the annotated value, or 0.0 when unusable.
    pub fn effective_sentiment(&self) -> f64 {
        self.sentiment.filter(|s| s.is_finite()).unwrap_or(0.0)
    }

    /// Sentiment mapped from [-1, 1] onto the 0–10 score scale.
    pub fn sentiment_impact(&self) -> f64 {
        (self.effective_sentiment() + 1.0) * 5.0
    }

    pub fn has_controversy(&self) -> bool {
        self.controversy_severity > 0.0
    }

    /// Integer severity. Only meaningful for documents that passed `validate`.
    pub fn severity_level(&self) -> i32 {
        self.controversy_severity as i32
    }

    /// Range checks for the annotations. Unusable sentiment is not an error.
    pub fn validate(&self) -> Result<(), DocumentRejection> {
        if let Some(s) = self.sentiment.filter(|s| s.is_finite()) {
            if !(-1.0..=1.0).contains(&s) {
                return Err(DocumentRejection::SentimentOutOfRange { value: s });
            }
        }
        let severity = self.controversy_severity;
        if !(severity.fract() == 0.0 && (0.0..=10.0).contains(&severity)) {
            return Err(DocumentRejection::SeverityOutOfRange { value: severity });
        }
        for pillar in Pillar::ALL {
            let value = self.topic_relevance.get(pillar);
            if !(0.0..=1.0).contains(&value) {
                return Err(DocumentRejection::RelevanceOutOfRange { pillar, value });
            }
        }
        Ok(())
    }
}

/// Accepts numbers, numeric strings, `null`, or anything else (→ `None`).
fn lenient_sentiment<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let parsed = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Some(n),
        Raw::Text(s) => s.trim().parse::<f64>().ok(),
        Raw::Other(_) => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

/// Numbers and numeric strings pass through; `null` is 0; anything else is NaN and
/// fails validation.
fn lenient_severity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let parsed = match Option::<Raw>::deserialize(deserializer)? {
        None => 0.0,
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Some(Raw::Other(_)) => f64::NAN,
    };
    Ok(parsed)
}
