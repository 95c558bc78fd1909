//! Before/after comparison of a filter pass

use crate::report::CrawlReport;
use serde::{Deserialize, Serialize};

/// How much a filter pass removed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub original_count: usize,
    pub filtered_count: usize,
    pub removed_count: usize,

    /// Kept pages as a percentage of the original, 0 when nothing was crawled
    pub retention_rate: f64,
}

/// Compares a report with its filtered counterpart
pub fn summarize(before: &CrawlReport, after: &CrawlReport) -> FilterSummary {
    let original_count = before.pages.len();
    let filtered_count = after.pages.len();
    let retention_rate = if original_count == 0 {
        0.0
    } else {
        filtered_count as f64 / original_count as f64 * 100.0
    };

    FilterSummary {
        original_count,
        filtered_count,
        removed_count: original_count.saturating_sub(filtered_count),
        retention_rate,
    }
}
