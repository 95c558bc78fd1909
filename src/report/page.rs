//! Per-page records
//!
//! A [`PageRecord`] holds what was fetched and extracted; a [`ScoredPage`] adds
//! the scorer's verdict. Degraded entries for failed fetches are `ScoredPage`s too,
//! so the report keeps one entry per attempted URL.

use crate::FetchError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Normalized content of one fetched page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageRecord {
    /// URL that was requested (the traversal's dedup key)
    pub url: String,

    /// URL after redirects
    #[serde(default)]
    pub final_url: String,

    /// Contents of `<title>`, empty when absent
    pub title: String,

    /// Visible text, whitespace-collapsed
    pub raw_text: String,

    /// Whitespace-delimited tokens of `raw_text`
    pub word_count: usize,

    /// Absolute link targets in document order
    pub links: Vec<String>,

    /// Absolute image sources in document order
    pub images: Vec<String>,

    /// HTTP status, unknown for the scripted engine
    pub status_code: Option<u16>,

    /// Time spent fetching
    #[serde(with = "duration_secs")]
    pub fetch_duration: Duration,

    /// `<meta name="description">` content
    #[serde(default)]
    pub description: Option<String>,

    /// `<meta name|property>` → content
    #[serde(default)]
    pub meta: BTreeMap<String, String>,

    /// Number of h1-h6 elements with text
    #[serde(default)]
    pub headings: usize,

    /// Number of non-empty paragraphs
    #[serde(default)]
    pub paragraphs: usize,

    /// Number of ul/ol lists with items
    #[serde(default)]
    pub lists: usize,

    /// Visible words inside nav, header, footer and aside elements
    #[serde(default)]
    pub boilerplate_words: usize,

    /// Publication date from meta tags or, failing that, the first date in the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDate>,
}

impl PageRecord {
    /// Attaches fetch metadata at construction time
    pub fn with_fetch(
        mut self,
        url: impl Into<String>,
        status_code: Option<u16>,
        fetch_duration: Duration,
    ) -> Self {
        self.url = url.into();
        self.status_code = status_code;
        self.fetch_duration = fetch_duration;
        self
    }

    /// Share of visible words that sit in navigation chrome
    pub fn boilerplate_ratio(&self) -> f64 {
        if self.word_count == 0 {
            return 0.0;
        }
        (self.boilerplate_words as f64 / self.word_count as f64).min(1.0)
    }
}

/// Content category assigned by the scorer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Blog,
    Product,
    News,
    Review,
    #[default]
    Unknown,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Blog => "blog",
            Self::Product => "product",
            Self::News => "news",
            Self::Review => "review",
            Self::Unknown => "unknown",
        }
    }

    pub fn all() -> [ContentType; 6] {
        [
            Self::Article,
            Self::Blog,
            Self::Product,
            Self::News,
            Self::Review,
            Self::Unknown,
        ]
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall tone of the page text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse quality band derived from the numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Language code used when detection has no confident answer
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// A page record enriched with the scorer's verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPage {
    #[serde(flatten)]
    pub page: PageRecord,

    /// Heuristic quality in [0, 100]
    pub quality_score: f64,

    pub content_type: ContentType,

    /// ISO-639-1 code or "unknown"
    pub language: String,

    pub sentiment: Sentiment,

    /// Most repeated meaningful words
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Highest-ranked sentences of the text, empty when none qualify
    #[serde(default)]
    pub summary: String,

    /// Fetch failure, present only on degraded entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoredPage {
    /// Builds the degraded entry recorded for a failed fetch
    pub fn degraded(url: impl Into<String>, error: &FetchError, elapsed: Duration) -> Self {
        let url = url.into();
        Self {
            page: PageRecord {
                final_url: url.clone(),
                url,
                status_code: error.status_code(),
                fetch_duration: elapsed,
                ..PageRecord::default()
            },
            quality_score: 0.0,
            content_type: ContentType::Unknown,
            language: UNKNOWN_LANGUAGE.to_string(),
            sentiment: Sentiment::Neutral,
            keywords: Vec::new(),
            summary: String::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn url(&self) -> &str {
        &self.page.url
    }

    pub fn word_count(&self) -> usize {
        self.page.word_count
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn quality_level(&self) -> QualityLevel {
        QualityLevel::from_score(self.quality_score)
    }
}

/// Serializes a `Duration` as fractional seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom("fetch_duration must be >= 0"));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}
