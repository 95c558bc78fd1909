//! Configuration module for Pagesift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use pagesift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagesift.toml")).unwrap();
//! println!("Crawl will stop after {} pages", config.crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, FetchEngine, FetchOptions, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
