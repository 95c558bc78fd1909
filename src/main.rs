//! Pagesift main entry point
//!
//! This is the command-line interface for the Pagesift crawler and content filter.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pagesift::config::{load_config_with_hash, validate, Config};
use pagesift::output::print_summary;
use pagesift::FetchEngine;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Pagesift: a same-host crawler with content-quality filtering
///
/// Pagesift walks a website breadth-first from a root URL, scores every page
/// with content heuristics, and keeps the pages that pass the configured filter.
#[derive(Parser, Debug)]
#[command(name = "pagesift")]
#[command(version)]
#[command(about = "A same-host crawler with content-quality filtering", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the root URL from the configuration
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Override the page budget from the configuration
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Override the fetch engine from the configuration
    #[arg(long, value_enum)]
    engine: Option<EngineArg>,

    /// Write the unfiltered report even if a filter is configured
    #[arg(long)]
    no_filter: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EngineArg {
    Plain,
    Scripted,
}

impl From<EngineArg> for FetchEngine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Plain => FetchEngine::Plain,
            EngineArg::Scripted => FetchEngine::Scripted,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        print_dry_run(&config, cli.no_filter);
        return Ok(());
    }

    handle_crawl(&config, cli.no_filter, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagesift=info,warn"),
            1 => EnvFilter::new("pagesift=debug,info"),
            2 => EnvFilter::new("pagesift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides and validates the result again
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(url) = &cli.url {
        config.crawl.root_url = url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawl.max_pages = max_pages;
    }
    if let Some(engine) = cli.engine {
        config.fetch.engine = engine.into();
    }

    validate(config).context("invalid command-line override")?;
    Ok(())
}

/// Handles the --dry-run mode: shows what would be crawled
fn print_dry_run(config: &Config, no_filter: bool) {
    println!("=== Pagesift Dry Run ===\n");

    println!("Crawl Configuration:");
    println!("  Root URL: {}", config.crawl.root_url);
    println!("  Max pages: {}", config.crawl.max_pages);
    println!("  Concurrency: {}", config.crawl.concurrency);
    println!("  Delay between requests: {}ms", config.crawl.delay_ms);
    match config.crawl.deadline_secs {
        Some(secs) => println!("  Deadline: {}s", secs),
        None => println!("  Deadline: none"),
    }
    println!("  Respect robots.txt: {}", config.crawl.respect_robots);
    if !config.crawl.extra_hosts.is_empty() {
        println!("  Extra hosts: {}", config.crawl.extra_hosts.join(", "));
    }

    println!("\nFetch:");
    println!("  Engine: {}", config.fetch.engine);
    println!("  Timeout: {}s", config.fetch.timeout);
    println!("  User agent: {}", config.fetch.user_agent);
    if config.fetch.engine == FetchEngine::Scripted {
        println!("  WebDriver: {}", config.fetch.webdriver_url);
        println!("  Headless: {}", config.fetch.headless);
        println!("  Script wait: {}s", config.fetch.wait_time);
    }

    println!("\nFilter:");
    match (&config.filter, no_filter) {
        (Some(_), true) => println!("  Disabled by --no-filter"),
        (Some(criteria), false) => println!("  {:?}", criteria),
        (None, _) => println!("  None"),
    }

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path);
    if let Some(summary_path) = &config.output.summary_path {
        println!("  Summary: {}", summary_path);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, no_filter: bool, quiet: bool) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping crawl");
            interrupt.cancel();
        }
    });

    let outcome = pagesift::run(config, cancel, !no_filter)
        .await
        .with_context(|| format!("crawl of {} failed", config.crawl.root_url))?;

    if !quiet {
        print_summary(&outcome.report, outcome.filter.as_ref());
    }

    Ok(())
}
