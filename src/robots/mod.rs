//! Robots.txt handling module
//!
//! The traversal fetches robots.txt of the root origin once, through the same
//! [`Fetcher`] that retrieves pages, and consults the resulting [`RobotsPolicy`]
//! before dispatching each URL.

mod parser;

pub use parser::{RobotsPolicy, MAX_CRAWL_DELAY};

use crate::config::FetchOptions;
use crate::crawler::Fetcher;
use crate::url::robots_url;
use std::time::Duration;
use url::Url;

/// Fetches robots.txt for the origin of `root`
///
/// Any failure (missing file, HTTP error, timeout) yields an allow-all policy;
/// robots.txt problems never fail a traversal.
pub async fn fetch_robots(
    fetcher: &dyn Fetcher,
    root: &Url,
    timeout: Duration,
    options: &FetchOptions,
) -> RobotsPolicy {
    let Some(url) = robots_url(root) else {
        return RobotsPolicy::allow_all();
    };

    match fetcher.fetch_text(&url, timeout, options).await {
        Ok(content) => {
            tracing::debug!("Loaded robots.txt from {}", url);
            RobotsPolicy::from_content(&content)
        }
        Err(e) => {
            tracing::debug!("No usable robots.txt at {} ({}), allowing all", url, e);
            RobotsPolicy::allow_all()
        }
    }
}
