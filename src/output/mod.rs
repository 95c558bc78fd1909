//! Output module for exporting crawl results
//!
//! This module handles:
//! - Writing the crawl report as JSON
//! - Generating markdown summaries of crawl results
//! - Aggregating and printing report statistics

mod json;
mod markdown;
pub mod stats;

pub use json::{read_json_report, write_json_report};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_summary, summarize_report, ReportSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
