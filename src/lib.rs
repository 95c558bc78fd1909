//! Pagesift: a same-host web crawler with content-quality filtering
//!
//! This crate walks a website breadth-first from a root URL, extracts a normalized
//! record for every page, scores each page with deterministic content heuristics,
//! and aggregates the results into a [`CrawlReport`] that can be reduced further
//! with the smart filter in [`filter`].

pub mod config;
pub mod crawler;
pub mod filter;
pub mod output;
mod pipeline;
pub mod report;
pub mod robots;
pub mod scoring;
pub mod state;
pub mod url;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Pagesift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetcher error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::TraversalState,
        to: state::TraversalState,
    },
}

/// Configuration-specific errors
///
/// These are the only errors that make a traversal fail as a whole. Everything
/// that goes wrong with an individual page is recorded in the report instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("max_pages must be at least 1, got {0}")]
    InvalidMaxPages(usize),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Failure of a single page fetch
///
/// A fetch is attempted exactly once; the traversal turns this into a degraded
/// report entry rather than propagating it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("HTTP error status {0}")]
    Http(u16),

    #[error("browser script error: {0}")]
    Script(String),

    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// HTTP status carried by the error, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http(status) => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for Pagesift operations
pub type Result<T> = std::result::Result<T, SiftError>;

// Re-export commonly used types
pub use config::{Config, FetchEngine, FetchOptions};
pub use crawler::{crawl, Coordinator, CrawlSettings};
pub use filter::{apply as apply_filter, FilterCriteria};
pub use pipeline::{run, RunOutcome};
pub use report::{ContentType, CrawlReport, PageRecord, ScoredPage, Sentiment};
pub use state::TraversalState;
