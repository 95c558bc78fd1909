//! Config-driven run: crawl, filter, write outputs
//!
//! This is what the command-line front end executes once the configuration has
//! been loaded and validated.

use crate::config::Config;
use crate::crawler::{build_fetcher, Coordinator, CrawlSettings};
use crate::filter::{self, FilterSummary};
use crate::output::{generate_markdown_summary, write_json_report};
use crate::report::CrawlReport;
use crate::Result;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The report that was written, filtered if a filter ran
    pub report: CrawlReport,

    /// Outcome of the filter pass, if one ran
    pub filter: Option<FilterSummary>,
}

/// Runs the crawl described by `config` and writes its outputs
///
/// # Arguments
///
/// * `config` - Validated configuration
/// * `cancel` - Stops the traversal early; the partial report is still written
/// * `use_filter` - Apply `config.filter` when one is configured
///
/// # Returns
///
/// * `Ok(RunOutcome)` - Report written (and summary, if configured)
/// * `Err(SiftError)` - Fetcher could not be built, the traversal was refused, or
///   an output could not be written
pub async fn run(config: &Config, cancel: CancellationToken, use_filter: bool) -> Result<RunOutcome> {
    let fetcher = build_fetcher(&config.fetch)?;
    let mut coordinator = Coordinator::new(
        fetcher,
        config.fetch.clone(),
        CrawlSettings::from_config(&config.crawl),
    )
    .with_cancellation(cancel);

    let report = coordinator
        .crawl(&config.crawl.root_url, config.crawl.max_pages)
        .await?;

    let (report, summary) = match &config.filter {
        Some(criteria) if use_filter => {
            let filtered = filter::apply(&report, criteria);
            let summary = filter::summarize(&report, &filtered);
            tracing::info!(
                "Filter kept {} of {} pages ({:.1}%)",
                summary.filtered_count,
                summary.original_count,
                summary.retention_rate
            );
            (filtered, Some(summary))
        }
        _ => (report, None),
    };

    let report_path = Path::new(&config.output.report_path);
    write_json_report(&report, report_path)?;
    tracing::info!("Report written to {}", report_path.display());

    if let Some(summary_path) = &config.output.summary_path {
        let summary_path = Path::new(summary_path);
        generate_markdown_summary(&report, summary.as_ref(), summary_path)?;
        tracing::info!("Summary written to {}", summary_path.display());
    }

    Ok(RunOutcome {
        report,
        filter: summary,
    })
}
