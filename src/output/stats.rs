//! Aggregate statistics over a crawl report
//!
//! This module condenses a [`CrawlReport`] into a [`ReportSummary`] and prints it
//! to stdout for the command-line front end.

use crate::filter::FilterSummary;
use crate::report::{ContentType, CrawlReport, Sentiment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics over the pages of one report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Entries in the report, degraded ones included
    pub total_pages: usize,

    /// Pages fetched and scored
    pub successful_pages: usize,

    /// Entries recorded for failed fetches
    pub degraded_pages: usize,

    pub total_words: usize,
    pub total_links: usize,
    pub total_images: usize,

    /// Mean quality over all entries
    pub avg_quality: f64,

    /// Mean quality over successful pages only
    pub avg_successful_quality: f64,

    /// URLs claimed by the traversal
    pub visited: usize,

    pub robots_blocked: usize,

    pub content_types: BTreeMap<ContentType, usize>,
    pub languages: BTreeMap<String, usize>,
    pub sentiments: BTreeMap<Sentiment, usize>,

    /// Error message of each degraded entry and how often it occurred
    pub errors: BTreeMap<String, usize>,
}

impl ReportSummary {
    /// Percentage of entries that were fetched successfully
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            0.0
        } else {
            self.successful_pages as f64 / self.total_pages as f64 * 100.0
        }
    }
}

/// Computes statistics for a report
///
/// Content type, language and sentiment counts cover successful pages only;
/// degraded entries are tallied under `errors`.
pub fn summarize_report(report: &CrawlReport) -> ReportSummary {
    let mut summary = ReportSummary {
        total_pages: report.pages.len(),
        total_words: report.total_words,
        avg_quality: report.avg_quality,
        visited: report.visited.len(),
        robots_blocked: report.robots_blocked.len(),
        ..ReportSummary::default()
    };

    let mut quality_sum = 0.0;
    for page in &report.pages {
        if let Some(error) = &page.error {
            summary.degraded_pages += 1;
            *summary.errors.entry(error.clone()).or_insert(0) += 1;
            continue;
        }

        summary.successful_pages += 1;
        summary.total_links += page.page.links.len();
        summary.total_images += page.page.images.len();
        quality_sum += page.quality_score;

        *summary.content_types.entry(page.content_type).or_insert(0) += 1;
        *summary.languages.entry(page.language.clone()).or_insert(0) += 1;
        *summary.sentiments.entry(page.sentiment).or_insert(0) += 1;
    }

    if summary.successful_pages > 0 {
        summary.avg_successful_quality = quality_sum / summary.successful_pages as f64;
    }

    summary
}

/// Prints report statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The (possibly filtered) report to describe
/// * `filter` - Outcome of the filter pass, if one ran
pub fn print_summary(report: &CrawlReport, filter: Option<&FilterSummary>) {
    let summary = summarize_report(report);

    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Root URL: {}", report.root_url);
    println!("  State: {}", report.state);
    println!("  Engine: {}", report.engine);
    if let Some(duration) = report.duration_seconds() {
        println!("  Duration: {:.2}s", duration);
    }
    println!("  URLs visited: {}", summary.visited);
    println!("  Still queued: {}", report.pending);
    println!("  Blocked by robots.txt: {}", summary.robots_blocked);
    println!();

    println!("Pages:");
    println!("  Total entries: {}", summary.total_pages);
    println!(
        "  Successful: {} ({:.1}%)",
        summary.successful_pages,
        summary.success_rate()
    );
    println!("  Degraded: {}", summary.degraded_pages);
    println!("  Total words: {}", summary.total_words);
    println!("  Total links: {}", summary.total_links);
    println!("  Total images: {}", summary.total_images);
    println!("  Average quality: {:.2}", summary.avg_quality);
    println!();

    if !summary.content_types.is_empty() {
        println!("Content Types:");
        let mut counts: Vec<_> = summary.content_types.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));
        for (content_type, count) in counts {
            println!("  {}: {}", content_type, count);
        }
        println!();
    }

    if !summary.languages.is_empty() {
        println!("Languages:");
        for (language, count) in &summary.languages {
            println!("  {}: {}", language, count);
        }
        println!();
    }

    if !summary.sentiments.is_empty() {
        println!("Sentiment:");
        for (sentiment, count) in &summary.sentiments {
            println!("  {}: {}", sentiment, count);
        }
        println!();
    }

    if !summary.errors.is_empty() {
        println!("Error Summary:");
        let mut errors: Vec<_> = summary.errors.iter().collect();
        errors.sort_by(|a, b| b.1.cmp(a.1));
        for (error, count) in errors {
            println!("  {}: {}", error, count);
        }
        println!();
    }

    if let Some(filter) = filter {
        println!(
            "Filter: kept {} of {} pages ({:.1}% retention, {} removed)",
            filter.filtered_count,
            filter.original_count,
            filter.retention_rate,
            filter.removed_count
        );
    }
}
