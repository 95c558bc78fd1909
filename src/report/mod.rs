//! Crawl report data model
//!
//! [`CrawlReport`] is the single artifact a traversal hands back to its caller.
//! Its aggregate fields are always derived from `pages` through
//! [`CrawlReport::recompute_totals`], so a report built by the coordinator and one
//! reduced by the filter follow the same arithmetic.

mod page;

pub use page::{ContentType, PageRecord, QualityLevel, ScoredPage, Sentiment, UNKNOWN_LANGUAGE};

use crate::config::FetchEngine;
use crate::state::TraversalState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Aggregate result of one traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub root_url: String,

    /// Scored pages and degraded entries in dispatch order
    pub pages: Vec<ScoredPage>,

    /// Every URL the traversal claimed, fetched or not
    pub visited: BTreeSet<String>,

    /// Sum of `word_count` over `pages`
    pub total_words: usize,

    /// Mean `quality_score` over `pages`, 0 when empty
    pub avg_quality: f64,

    /// Final traversal state
    pub state: TraversalState,

    /// URLs still queued when the traversal stopped
    #[serde(default)]
    pub pending: usize,

    /// URLs skipped because robots.txt disallowed them
    #[serde(default)]
    pub robots_blocked: Vec<String>,

    pub engine: FetchEngine,

    pub started_at: DateTime<Utc>,

    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlReport {
    /// Creates an empty report for a traversal rooted at `root_url`
    pub fn new(root_url: impl Into<String>, engine: FetchEngine) -> Self {
        Self {
            root_url: root_url.into(),
            pages: Vec::new(),
            visited: BTreeSet::new(),
            total_words: 0,
            avg_quality: 0.0,
            state: TraversalState::Running,
            pending: 0,
            robots_blocked: Vec::new(),
            engine,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Returns a copy of this report carrying a different page list
    ///
    /// Everything except `pages` and the derived totals is preserved.
    pub fn with_pages(&self, pages: Vec<ScoredPage>) -> Self {
        let mut report = Self {
            root_url: self.root_url.clone(),
            pages,
            visited: self.visited.clone(),
            total_words: 0,
            avg_quality: 0.0,
            state: self.state,
            pending: self.pending,
            robots_blocked: self.robots_blocked.clone(),
            engine: self.engine,
            started_at: self.started_at,
            finished_at: self.finished_at,
        };
        report.recompute_totals();
        report
    }

    /// Recomputes `total_words` and `avg_quality` from `pages`
    pub fn recompute_totals(&mut self) {
        self.total_words = self.pages.iter().map(|p| p.word_count()).sum();
        self.avg_quality = if self.pages.is_empty() {
            0.0
        } else {
            let sum: f64 = self.pages.iter().map(|p| p.quality_score).sum();
            sum / self.pages.len() as f64
        };
    }

    /// Marks the traversal finished with the given terminal state
    pub fn finish(&mut self, state: TraversalState, pending: usize) {
        self.state = state;
        self.pending = pending;
        self.finished_at = Some(Utc::now());
        self.recompute_totals();
    }

    /// Pages that were fetched and scored
    pub fn successful_pages(&self) -> impl Iterator<Item = &ScoredPage> {
        self.pages.iter().filter(|p| !p.is_degraded())
    }

    /// Entries recorded for failed fetches
    pub fn degraded_pages(&self) -> impl Iterator<Item = &ScoredPage> {
        self.pages.iter().filter(|p| p.is_degraded())
    }

    pub fn contains_page(&self, url: &str) -> bool {
        self.pages.iter().any(|p| p.url() == url)
    }

    /// Wall-clock duration of the traversal in seconds, if finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}
