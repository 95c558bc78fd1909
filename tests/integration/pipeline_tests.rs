//! Config → crawl → filter → output, end to end

use crate::support::html_page;
use pagesift::config::{load_config, parse_config, Config};
use pagesift::crawler::{build_fetcher, Coordinator};
use pagesift::filter::{self, FilterCriteria};
use pagesift::output::{generate_markdown_summary, read_json_report, write_json_report};
use pagesift::{CrawlSettings, SiftError, TraversalState};
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LONG_ARTICLE: &str = "Published by the editorial team. This article explains in great \
    detail how the new storage engine works and why the design keeps every write durable. \
    The author walks through the write path step by step, describing the log, the memtable \
    and the compaction process. Readers learn how snapshots are taken, how recovery replays \
    the log after a crash and how the engine keeps latency predictable under heavy load. \
    The article closes with a summary of the benchmarks and a short list of further reading.";

async fn site() -> MockServer {
    let server = MockServer::start().await;
    let pages = [
        ("/", html_page("Home", "Welcome.", &["/article", "/tiny"])),
        ("/article", html_page("Storage engine deep dive", LONG_ARTICLE, &[])),
        ("/tiny", html_page("Tiny", "Buy now.", &[])),
    ];
    for (route, body) in pages {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;
    }
    server
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_config_driven_run() {
    let server = site().await;
    let out = TempDir::new().unwrap();
    let report_path = out.path().join("report.json");
    let summary_path = out.path().join("summary.md");

    let config_file = write_config(&format!(
        r#"
[crawl]
root-url = "{}"
max-pages = 10
delay-ms = 0

[fetch]
timeout-secs = 5

[filter]
min-word-count = 20

[output]
report-path = "{}"
summary-path = "{}"
"#,
        server.uri(),
        report_path.display(),
        summary_path.display()
    ));

    let config = load_config(config_file.path()).unwrap();
    let fetcher = build_fetcher(&config.fetch).unwrap();
    let mut coordinator = Coordinator::new(
        fetcher,
        config.fetch.clone(),
        CrawlSettings::from_config(&config.crawl),
    );
    let report = coordinator
        .crawl(&config.crawl.root_url, config.crawl.max_pages)
        .await
        .unwrap();
    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.state, TraversalState::Completed);

    let criteria = config.filter.as_ref().unwrap();
    let filtered = filter::apply(&report, criteria);
    let summary = filter::summarize(&report, &filtered);

    assert_eq!(filtered.pages.len(), 1);
    assert!(filtered.pages[0].url().ends_with("/article"));
    assert_eq!(filtered.visited, report.visited);
    assert_eq!(summary.removed_count, 2);

    write_json_report(&filtered, &report_path).unwrap();
    generate_markdown_summary(&filtered, Some(&summary), &summary_path).unwrap();

    let loaded = read_json_report(&report_path).unwrap();
    assert_eq!(loaded, filtered);

    let markdown = std::fs::read_to_string(&summary_path).unwrap();
    assert!(markdown.contains("Storage engine deep dive"));
    assert!(markdown.contains("## Filter"));
}

#[tokio::test]
async fn test_filter_on_real_crawl() {
    let server = site().await;
    let report = pagesift::crawl(&server.uri(), 10, &Default::default())
        .await
        .unwrap();

    // Defaults keep everything
    assert_eq!(filter::apply(&report, &FilterCriteria::default()), report);

    let criteria = FilterCriteria {
        min_quality: report.avg_quality,
        exclude_keywords: vec!["buy now".to_string()],
        ..FilterCriteria::default()
    };
    let once = filter::apply(&report, &criteria);
    let twice = filter::apply(&once, &criteria);
    assert_eq!(once, twice);
    assert!(once.pages.len() < report.pages.len());
    assert!(once.pages.iter().all(|p| p.quality_score >= report.avg_quality));

    // Nothing passes an impossible threshold, and that is still a valid report
    let none = filter::apply(
        &report,
        &FilterCriteria {
            min_quality: 100.0,
            ..FilterCriteria::default()
        },
    );
    assert!(none.pages.is_empty());
    assert_eq!(none.total_words, 0);
    assert_eq!(none.avg_quality, 0.0);
}

fn run_config(root: &str, report_path: &Path, summary_path: &Path) -> Config {
    parse_config(&format!(
        r#"
[crawl]
root-url = "{}"
max-pages = 10
delay-ms = 0

[filter]
min-word-count = 20

[output]
report-path = "{}"
summary-path = "{}"
"#,
        root,
        report_path.display(),
        summary_path.display()
    ))
    .unwrap()
}

#[tokio::test]
async fn test_run_writes_outputs() {
    let server = site().await;
    let out = TempDir::new().unwrap();
    let report_path = out.path().join("report.json");
    let summary_path = out.path().join("summary.md");
    let config = run_config(&server.uri(), &report_path, &summary_path);

    let outcome = pagesift::run(&config, CancellationToken::new(), true)
        .await
        .unwrap();

    assert_eq!(outcome.report.pages.len(), 1);
    assert_eq!(outcome.filter.map(|f| f.original_count), Some(3));
    assert_eq!(read_json_report(&report_path).unwrap(), outcome.report);
    assert!(summary_path.exists());

    let unfiltered = pagesift::run(&config, CancellationToken::new(), false)
        .await
        .unwrap();
    assert_eq!(unfiltered.report.pages.len(), 3);
    assert!(unfiltered.filter.is_none());
}

#[tokio::test]
async fn test_run_cancelled_writes_partial_report() {
    let server = site().await;
    let out = TempDir::new().unwrap();
    let report_path = out.path().join("report.json");
    let config = run_config(&server.uri(), &report_path, &out.path().join("summary.md"));

    let cancel = CancellationToken::new();
    cancel.cancel();
    let outcome = pagesift::run(&config, cancel, false).await.unwrap();

    assert_eq!(outcome.report.state, TraversalState::Aborted);
    assert!(outcome.report.pages.is_empty());
    assert_eq!(read_json_report(&report_path).unwrap().state, TraversalState::Aborted);
}

#[tokio::test]
async fn test_run_error_kinds() {
    let server = site().await;
    let out = TempDir::new().unwrap();
    let summary_path = out.path().join("summary.md");

    let mut config = run_config(&server.uri(), &out.path().join("report.json"), &summary_path);
    config.crawl.root_url = "not a url at all".to_string();
    let result = pagesift::run(&config, CancellationToken::new(), true).await;
    assert!(matches!(result, Err(SiftError::Config(_))));

    // A regular file cannot be a parent directory
    let blocker = out.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let config = run_config(&server.uri(), &blocker.join("report.json"), &summary_path);
    let result = pagesift::run(&config, CancellationToken::new(), true).await;
    assert!(matches!(result, Err(SiftError::Output(_))));
}
