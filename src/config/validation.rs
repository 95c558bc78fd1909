use crate::config::types::{Config, CrawlConfig, FetchEngine, FetchOptions, OutputConfig};
use crate::url::{parse_root_url, HostPattern};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent fetches
const MAX_CONCURRENCY: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_fetch_options(&config.fetch)?;
    if let Some(filter) = &config.filter {
        filter.validate()?;
    }
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates traversal configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    parse_root_url(&config.root_url)?;

    if config.max_pages < 1 {
        return Err(ConfigError::InvalidMaxPages(config.max_pages));
    }

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "deadline-secs must be >= 1 when set".to_string(),
        ));
    }

    for pattern in &config.extra_hosts {
        HostPattern::parse(pattern)?;
    }

    Ok(())
}

/// Validates fetch options
fn validate_fetch_options(options: &FetchOptions) -> Result<(), ConfigError> {
    if options.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            options.timeout
        )));
    }

    if options.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if options.engine == FetchEngine::Scripted {
        Url::parse(&options.webdriver_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver-url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "report-path cannot be empty".to_string(),
        ));
    }

    if config
        .summary_path
        .as_deref()
        .map_or(false, |p| p.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
