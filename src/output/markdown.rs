//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of crawl results,
//! including statistics, the best-scoring pages, and failed fetches.

use crate::filter::FilterSummary;
use crate::output::stats::summarize_report;
use crate::output::OutputResult;
use crate::report::CrawlReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Number of pages listed in the top-quality table
const TOP_PAGES: usize = 20;

/// Generates a markdown summary of a crawl report
///
/// # Arguments
///
/// * `report` - The (possibly filtered) crawl report
/// * `filter` - Outcome of the filter pass, if one ran
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(
    report: &CrawlReport,
    filter: Option<&FilterSummary>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(report, filter);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport, filter: Option<&FilterSummary>) -> String {
    let summary = summarize_report(report);
    let mut md = String::new();

    md.push_str("# Pagesift Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root URL**: {}\n", report.root_url));
    md.push_str(&format!("- **Engine**: {}\n", report.engine));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", duration));
    }
    md.push_str(&format!("- **State**: {}\n\n", report.state));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages**: {}\n", summary.total_pages));
    md.push_str(&format!(
        "- **Successful**: {} ({:.2}%)\n",
        summary.successful_pages,
        summary.success_rate()
    ));
    md.push_str(&format!("- **Degraded**: {}\n", summary.degraded_pages));
    md.push_str(&format!("- **URLs Visited**: {}\n", summary.visited));
    md.push_str(&format!("- **Still Queued**: {}\n", report.pending));
    md.push_str(&format!(
        "- **Blocked by robots.txt**: {}\n",
        summary.robots_blocked
    ));
    md.push_str(&format!("- **Total Words**: {}\n", summary.total_words));
    md.push_str(&format!("- **Total Links**: {}\n", summary.total_links));
    md.push_str(&format!("- **Total Images**: {}\n", summary.total_images));
    md.push_str(&format!(
        "- **Average Quality**: {:.2}\n\n",
        summary.avg_quality
    ));

    if let Some(filter) = filter {
        md.push_str("## Filter\n\n");
        md.push_str("| Original | Kept | Removed | Retention |\n");
        md.push_str("|----------|------|---------|-----------|\n");
        md.push_str(&format!(
            "| {} | {} | {} | {:.1}% |\n\n",
            filter.original_count, filter.filtered_count, filter.removed_count, filter.retention_rate
        ));
    }

    if !summary.content_types.is_empty() {
        md.push_str("## Content Types\n\n");
        md.push_str("| Type | Pages |\n");
        md.push_str("|------|-------|\n");
        for (content_type, count) in &summary.content_types {
            md.push_str(&format!("| {} | {} |\n", content_type, count));
        }
        md.push('\n');
    }

    if !summary.languages.is_empty() {
        md.push_str("## Languages\n\n");
        md.push_str("| Language | Pages |\n");
        md.push_str("|----------|-------|\n");
        for (language, count) in &summary.languages {
            md.push_str(&format!("| {} | {} |\n", language, count));
        }
        md.push('\n');
    }

    // Best pages first; ties keep report order
    let mut ranked: Vec<_> = report.successful_pages().collect();
    ranked.sort_by(|a, b| b.quality_score.total_cmp(&a.quality_score));
    if !ranked.is_empty() {
        md.push_str(&format!("## Top {} Pages by Quality\n\n", TOP_PAGES));
        md.push_str("| URL | Title | Type | Words | Quality |\n");
        md.push_str("|-----|-------|------|-------|---------|\n");
        for page in ranked.iter().take(TOP_PAGES) {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {:.2} |\n",
                page.url(),
                escape_cell(&page.page.title),
                page.content_type,
                page.word_count(),
                page.quality_score
            ));
        }
        md.push('\n');
    }

    let degraded: Vec<_> = report.degraded_pages().collect();
    if !degraded.is_empty() {
        md.push_str("## Failed Fetches\n\n");
        md.push_str("| URL | Error |\n");
        md.push_str("|-----|-------|\n");
        for page in degraded {
            md.push_str(&format!(
                "| {} | {} |\n",
                page.url(),
                escape_cell(page.error.as_deref().unwrap_or_default())
            ));
        }
        md.push('\n');
    }

    if !report.robots_blocked.is_empty() {
        md.push_str("## Blocked by robots.txt\n\n");
        for url in &report.robots_blocked {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
