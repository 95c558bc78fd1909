//! Smart content filter
//!
//! A pure pass over a finished [`CrawlReport`]: it keeps the pages that satisfy
//! every criterion, in their original order, and recomputes the report totals.
//! Applying the same criteria twice changes nothing, and default criteria keep
//! every page.
//!
//! Most criteria look at one page at a time ([`FilterCriteria::matches`]). The
//! optional duplicate threshold compares pages with each other: among pages
//! whose word sets are at least that similar, only the first one is kept.
//!
//! # Example
//!
//! ```
//! use pagesift::filter::{apply, FilterCriteria};
//! use pagesift::{ContentType, CrawlReport, FetchEngine};
//!
//! let report = CrawlReport::new("https://example.com/", FetchEngine::Plain);
//! let criteria = FilterCriteria {
//!     min_quality: 40.0,
//!     allowed_content_types: vec![ContentType::Article, ContentType::Blog],
//!     ..FilterCriteria::default()
//! };
//! let filtered = apply(&report, &criteria);
//! assert!(filtered.pages.is_empty());
//! ```

mod duplicates;
mod summary;

pub use duplicates::similarity;
pub use summary::{summarize, FilterSummary};

use crate::report::{ContentType, CrawlReport, ScoredPage, Sentiment, UNKNOWN_LANGUAGE};
use crate::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Predicates a page must satisfy to survive the filter
///
/// Every field defaults to a no-op: an empty allow-list accepts anything, a zero
/// minimum accepts everything and a missing maximum is unbounded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterCriteria {
    /// Lowest acceptable quality score
    pub min_quality: f64,

    pub allowed_content_types: Vec<ContentType>,

    /// ISO-639-1 codes (or "unknown"), compared case-insensitively
    pub allowed_languages: Vec<String>,

    pub allowed_sentiments: Vec<Sentiment>,

    pub min_word_count: usize,
    pub max_word_count: Option<usize>,

    /// At least one must occur in the title or text (case-insensitive)
    pub include_keywords: Vec<String>,

    /// None may occur in the title or text (case-insensitive)
    pub exclude_keywords: Vec<String>,

    /// At least one must be a substring of the URL (case-insensitive)
    pub url_patterns: Vec<String>,

    /// None may be a substring of the URL (case-insensitive)
    pub exclude_url_patterns: Vec<String>,

    pub min_links: usize,
    pub max_links: Option<usize>,
    pub min_images: usize,
    pub max_images: Option<usize>,

    /// Inclusive publication window; undated pages always pass
    pub date_range: Option<DateRange>,

    /// Jaccard similarity in (0, 1] at which a later page counts as a duplicate
    /// of an earlier kept one
    pub duplicate_threshold: Option<f64>,
}

/// Publication window, either end open
///
/// Dates are written as quoted ISO strings in TOML:
/// `date-range = { start = "2024-01-01", end = "2024-06-30" }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl FilterCriteria {
    /// Returns true if every criterion is a no-op
    pub fn is_identity(&self) -> bool {
        self.min_quality <= 0.0
            && self.allowed_content_types.is_empty()
            && self.allowed_languages.is_empty()
            && self.allowed_sentiments.is_empty()
            && self.min_word_count == 0
            && self.max_word_count.is_none()
            && self.include_keywords.is_empty()
            && self.exclude_keywords.is_empty()
            && self.url_patterns.is_empty()
            && self.exclude_url_patterns.is_empty()
            && self.min_links == 0
            && self.max_links.is_none()
            && self.min_images == 0
            && self.max_images.is_none()
            && self.date_range.map_or(true, |range| range.is_open())
            && self.duplicate_threshold.is_none()
    }

    /// Checks that the criteria can be satisfied at all
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_quality.is_finite() || !(0.0..=100.0).contains(&self.min_quality) {
            return Err(ConfigError::Validation(format!(
                "min-quality must be between 0 and 100, got {}",
                self.min_quality
            )));
        }

        check_bounds("word-count", self.min_word_count, self.max_word_count)?;
        check_bounds("links", self.min_links, self.max_links)?;
        check_bounds("images", self.min_images, self.max_images)?;

        if let Some(DateRange {
            start: Some(start),
            end: Some(end),
        }) = self.date_range
        {
            if end < start {
                return Err(ConfigError::Validation(format!(
                    "date-range end ({}) is before its start ({})",
                    end, start
                )));
            }
        }

        if let Some(threshold) = self.duplicate_threshold {
            if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
                return Err(ConfigError::Validation(format!(
                    "duplicate-threshold must be in (0, 1], got {}",
                    threshold
                )));
            }
        }

        for language in &self.allowed_languages {
            let valid = language == UNKNOWN_LANGUAGE
                || (language.len() == 2 && language.chars().all(|c| c.is_ascii_lowercase()));
            if !valid {
                return Err(ConfigError::Validation(format!(
                    "allowed-languages entries must be ISO-639-1 codes or \"unknown\", got '{}'",
                    language
                )));
            }
        }

        for term in self
            .include_keywords
            .iter()
            .chain(&self.exclude_keywords)
            .chain(&self.url_patterns)
            .chain(&self.exclude_url_patterns)
        {
            if term.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "filter keywords and URL patterns cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Returns true if `page` satisfies every per-page criterion
    ///
    /// The duplicate threshold needs the other pages and is applied by [`apply`].
    pub fn matches(&self, page: &ScoredPage) -> bool {
        if page.quality_score < self.min_quality {
            return false;
        }

        if !self.allowed_content_types.is_empty()
            && !self.allowed_content_types.contains(&page.content_type)
        {
            return false;
        }

        if !self.allowed_languages.is_empty()
            && !self
                .allowed_languages
                .iter()
                .any(|l| l.eq_ignore_ascii_case(&page.language))
        {
            return false;
        }

        if !self.allowed_sentiments.is_empty() && !self.allowed_sentiments.contains(&page.sentiment)
        {
            return false;
        }

        let record = &page.page;
        if !within(record.word_count, self.min_word_count, self.max_word_count)
            || !within(record.links.len(), self.min_links, self.max_links)
            || !within(record.images.len(), self.min_images, self.max_images)
        {
            return false;
        }

        if !self.include_keywords.is_empty() || !self.exclude_keywords.is_empty() {
            let haystack = format!("{} {}", record.title, record.raw_text).to_lowercase();
            if !self.include_keywords.is_empty()
                && !contains_any(&haystack, &self.include_keywords)
            {
                return false;
            }
            if contains_any(&haystack, &self.exclude_keywords) {
                return false;
            }
        }

        if let (Some(range), Some(published)) = (self.date_range, record.published) {
            if !range.contains(published) {
                return false;
            }
        }

        if !self.url_patterns.is_empty() || !self.exclude_url_patterns.is_empty() {
            let url = record.url.to_lowercase();
            if !self.url_patterns.is_empty() && !contains_any(&url, &self.url_patterns) {
                return false;
            }
            if contains_any(&url, &self.exclude_url_patterns) {
                return false;
            }
        }

        true
    }
}

fn check_bounds(name: &str, min: usize, max: Option<usize>) -> Result<(), ConfigError> {
    match max {
        Some(max) if max < min => Err(ConfigError::Validation(format!(
            "max-{} ({}) is below min-{} ({})",
            name, max, name, min
        ))),
        _ => Ok(()),
    }
}

fn within(value: usize, min: usize, max: Option<usize>) -> bool {
    value >= min && max.map_or(true, |max| value <= max)
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| haystack.contains(needle.to_lowercase().as_str()))
}

/// Reduces a report to the pages matching `criteria`
///
/// The input is not modified. Page order, `visited`, `state` and every other
/// report field are carried over; `total_words` and `avg_quality` are recomputed
/// over the surviving pages. An empty result is a valid report.
pub fn apply(report: &CrawlReport, criteria: &FilterCriteria) -> CrawlReport {
    let matching = report.pages.iter().filter(|page| criteria.matches(page));

    let pages: Vec<ScoredPage> = match criteria.duplicate_threshold {
        Some(threshold) => duplicates::first_of_each(matching, threshold),
        None => matching.cloned().collect(),
    };

    tracing::debug!(
        "Filter kept {} of {} pages",
        pages.len(),
        report.pages.len()
    );

    report.with_pages(pages)
}

/// Groups successfully scored pages by content type
pub fn categorize(report: &CrawlReport) -> BTreeMap<ContentType, Vec<&ScoredPage>> {
    let mut categories: BTreeMap<ContentType, Vec<&ScoredPage>> = BTreeMap::new();
    for page in report.successful_pages() {
        categories.entry(page.content_type).or_default().push(page);
    }
    categories
}
