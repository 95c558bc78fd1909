//! End-to-end traversal tests

use crate::support::{html_page, MemorySite};
use pagesift::crawler::{Coordinator, Fetcher};
use pagesift::{crawl, ConfigError, CrawlSettings, FetchOptions, TraversalState};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_page_without_links() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html_page("Home", "A lonely page with nothing to link to.", &[]),
    )
    .await;

    let report = crawl(&server.uri(), 5, &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.state, TraversalState::Completed);
    assert_eq!(report.pending, 0);

    let page = &report.pages[0];
    assert!(!page.is_degraded());
    assert_eq!(page.page.title, "Home");
    assert_eq!(page.page.status_code, Some(200));
    assert_eq!(report.total_words, page.word_count());
    assert!((0.0..=100.0).contains(&page.quality_score));
}

#[tokio::test]
async fn test_budget_stops_traversal() {
    let server = MockServer::start().await;

    let routes: Vec<String> = (1..=10).map(|i| format!("/article-{}", i)).collect();
    let links: Vec<&str> = routes.iter().map(String::as_str).collect();
    mount_page(&server, "/", html_page("Index", "Ten articles below.", &links)).await;
    for route in &routes {
        mount_page(&server, route, html_page("Article", "Body text.", &[])).await;
    }

    let report = crawl(&server.uri(), 3, &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.state, TraversalState::Completed);
    assert_eq!(report.pending, 8);
    assert!(report.pages[1].url().ends_with("/article-1"));
    assert!(report.pages[2].url().ends_with("/article-2"));
}

#[tokio::test]
async fn test_timeout_yields_degraded_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow", "Eventually.", &[]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let options = FetchOptions {
        timeout: 1,
        ..FetchOptions::default()
    };
    let report = crawl(&server.uri(), 5, &options).await.unwrap();

    assert_eq!(report.state, TraversalState::Completed);
    assert_eq!(report.pages.len(), 1);

    let entry = &report.pages[0];
    assert!(entry.is_degraded());
    assert_eq!(entry.quality_score, 0.0);
    assert_eq!(entry.word_count(), 0);
    assert_eq!(entry.error.as_deref(), Some("request timed out"));
}

#[tokio::test]
async fn test_http_errors_are_recorded() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html_page("Home", "Links to a missing page.", &["/missing"]),
    )
    .await;

    let report = crawl(&server.uri(), 5, &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.degraded_pages().count(), 1);
    let missing = &report.pages[1];
    assert!(missing.url().ends_with("/missing"));
    assert_eq!(missing.page.status_code, Some(404));
}

#[tokio::test]
async fn test_robots_disallow_is_honored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        html_page("Home", "Public and private.", &["/public", "/private/page"]),
    )
    .await;
    mount_page(&server, "/public", html_page("Public", "Open.", &[])).await;
    mount_page(&server, "/private/page", html_page("Private", "Closed.", &[])).await;

    let report = crawl(&server.uri(), 10, &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert!(report.pages.iter().all(|p| !p.url().contains("/private")));
    assert_eq!(report.robots_blocked.len(), 1);
    assert!(report.robots_blocked[0].ends_with("/private/page"));
}

#[tokio::test]
async fn test_identical_content_kept_under_both_urls() {
    let server = MockServer::start().await;
    let body = html_page("Same", "Exactly the same words on two pages.", &[]);
    mount_page(&server, "/", html_page("Home", "Two copies.", &["/a", "/b"])).await;
    mount_page(&server, "/a", body.clone()).await;
    mount_page(&server, "/b", body).await;

    let report = crawl(&server.uri(), 10, &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.pages[1].page.raw_text, report.pages[2].page.raw_text);
    assert_ne!(report.pages[1].url(), report.pages[2].url());
}

#[tokio::test]
async fn test_invalid_arguments_are_config_errors() {
    let options = FetchOptions::default();

    let result = crawl("not a url at all", 5, &options).await;
    assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));

    let result = crawl("https://example.com/", 0, &options).await;
    assert!(matches!(result, Err(ConfigError::InvalidMaxPages(0))));
}

#[tokio::test]
async fn test_traversal_properties_hold() {
    let base = "https://site.test";
    let site: Arc<dyn Fetcher> = Arc::new(MemorySite::binary_tree(base, 40));

    for (max_pages, concurrency) in [(1, 1), (7, 1), (25, 4), (100, 8)] {
        let settings = CrawlSettings {
            concurrency,
            ..CrawlSettings::default()
        };
        let mut coordinator = Coordinator::new(site.clone(), FetchOptions::default(), settings);
        let report = coordinator.crawl(base, max_pages).await.unwrap();

        assert!(report.pages.len() <= max_pages);
        assert_eq!(report.state, TraversalState::Completed);

        let urls: HashSet<&str> = report.pages.iter().map(|p| p.url()).collect();
        assert_eq!(urls.len(), report.pages.len(), "duplicate URL in report");

        let words: usize = report.pages.iter().map(|p| p.word_count()).sum();
        assert_eq!(report.total_words, words);

        for page in &report.pages {
            assert!(report.visited.contains(page.url()));
            assert!(page.url().starts_with(base));
        }
    }
}

#[tokio::test]
async fn test_breadth_first_order() {
    let base = "https://site.test";
    let site = MemorySite::default()
        .page(&format!("{}/", base), html_page("Root", "root", &["/a", "/b"]))
        .page(&format!("{}/a", base), html_page("A", "a", &["/a/deep"]))
        .page(&format!("{}/b", base), html_page("B", "b", &[]))
        .page(&format!("{}/a/deep", base), html_page("Deep", "deep", &[]));

    let mut coordinator = Coordinator::new(
        Arc::new(site),
        FetchOptions::default(),
        CrawlSettings::default(),
    );
    let report = coordinator.crawl(base, 10).await.unwrap();

    let paths: Vec<&str> = report
        .pages
        .iter()
        .map(|p| p.url().trim_start_matches(base))
        .collect();
    assert_eq!(paths, vec!["/", "/a", "/b", "/a/deep"]);
}

#[tokio::test]
async fn test_deadline_aborts_with_partial_report() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("Home", "Start.", &["/slow"])).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow", "Late.", &[]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let options = FetchOptions::default();
    let fetcher = pagesift::crawler::build_fetcher(&options).unwrap();
    let settings = CrawlSettings {
        deadline: Some(Duration::from_millis(1500)),
        ..CrawlSettings::default()
    };
    let mut coordinator = Coordinator::new(fetcher, options, settings);
    let report = coordinator.crawl(&server.uri(), 10).await.unwrap();

    assert_eq!(report.state, TraversalState::Aborted);
    assert_eq!(coordinator.state(), TraversalState::Aborted);
    assert_eq!(report.pages.len(), 1);
    assert!(report.visited.iter().any(|u| u.ends_with("/slow")));
}
