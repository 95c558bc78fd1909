use crate::filter::FilterCriteria;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Main configuration structure for Pagesift
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub fetch: FetchOptions,

    /// Smart filter applied to the finished report, if any
    #[serde(default)]
    pub filter: Option<FilterCriteria>,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Traversal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// URL the traversal starts from
    pub root_url: String,

    /// Upper bound on fetched pages (degraded entries included)
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Number of fetches allowed in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Minimum time between two dispatches (milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Overall time limit for the traversal (seconds)
    #[serde(default)]
    pub deadline_secs: Option<u64>,

    #[serde(default = "default_true")]
    pub respect_robots: bool,

    /// Host patterns treated as in scope besides the root host
    #[serde(default)]
    pub extra_hosts: Vec<String>,
}

/// Which engine retrieves pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchEngine {
    /// Plain HTTP GET
    #[default]
    Plain,
    /// Headless browser driven over WebDriver, for script-rendered pages
    Scripted,
}

impl FetchEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Scripted => "scripted",
        }
    }
}

impl fmt::Display for FetchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-fetch options shared by both engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetchOptions {
    #[serde(default)]
    pub engine: FetchEngine,

    /// Per-fetch timeout (seconds)
    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout: u64,

    /// Run the browser without a window (scripted engine only)
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Seconds to let page scripts run before reading the DOM (scripted engine only)
    #[serde(default = "default_wait_time")]
    pub wait_time: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// WebDriver endpoint (scripted engine only)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

impl FetchOptions {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn wait_duration(&self) -> Duration {
        Duration::from_secs(self.wait_time)
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            engine: FetchEngine::Plain,
            timeout: default_timeout_secs(),
            headless: true,
            wait_time: default_wait_time(),
            user_agent: default_user_agent(),
            webdriver_url: default_webdriver_url(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the JSON report
    #[serde(default = "default_report_path")]
    pub report_path: String,

    /// Path of the markdown summary, none to skip it
    #[serde(default)]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            summary_path: None,
        }
    }
}

fn default_max_pages() -> usize {
    20
}

fn default_concurrency() -> usize {
    1
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_wait_time() -> u64 {
    3
}

fn default_user_agent() -> String {
    format!("pagesift/{}", env!("CARGO_PKG_VERSION"))
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_report_path() -> String {
    "crawl_report.json".to_string()
}
