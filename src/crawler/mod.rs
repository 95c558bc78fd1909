//! Crawler module for web page fetching and processing
//!
//! This module contains the traversal itself:
//! - The fetch capability and its plain HTTP and scripted-browser engines
//! - HTML extraction into page records, publication dates included
//! - The FIFO frontier with visited tracking
//! - Overall traversal coordination

mod browser;
mod coordinator;
mod dates;
mod fetcher;
mod frontier;
mod parser;

pub use browser::{chrome_capabilities, BrowserFetcher};
pub use coordinator::{Coordinator, CrawlSettings};
pub use fetcher::{build_fetcher, build_http_client, Fetcher, HttpFetcher, RawPage};
pub use frontier::Frontier;
pub use parser::extract;

use crate::config::FetchOptions;
use crate::report::CrawlReport;
use crate::ConfigError;

/// Runs a complete traversal with default settings
///
/// Builds the engine named in `options`, then crawls same-host pages breadth-first
/// from `root_url` until `max_pages` fetches have been made or nothing is left to
/// visit.
///
/// # Arguments
///
/// * `root_url` - Where the traversal starts
/// * `max_pages` - Upper bound on fetched pages, failed fetches included
/// * `options` - Fetch engine and per-fetch options
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Traversal finished (possibly with degraded entries)
/// * `Err(ConfigError)` - Invalid root URL or page budget; nothing was fetched
///
/// # Example
///
/// ```no_run
/// use pagesift::{crawl, FetchOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl("https://example.com/", 10, &FetchOptions::default()).await?;
/// println!("{} pages, average quality {:.1}", report.pages.len(), report.avg_quality);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    root_url: &str,
    max_pages: usize,
    options: &FetchOptions,
) -> Result<CrawlReport, ConfigError> {
    let fetcher = build_fetcher(options)
        .map_err(|e| ConfigError::Validation(format!("cannot build fetcher: {}", e)))?;
    let mut coordinator = Coordinator::new(fetcher, options.clone(), CrawlSettings::default());
    coordinator.crawl(root_url, max_pages).await
}
