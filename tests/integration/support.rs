//! Shared fixtures for the integration tests

use async_trait::async_trait;
use pagesift::crawler::{Fetcher, RawPage};
use pagesift::{FetchEngine, FetchOptions};
use pagesift::FetchError;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// A site served from memory
///
/// URLs without a page answer with HTTP 404; robots.txt is never present.
#[derive(Default)]
pub struct MemorySite {
    pages: HashMap<String, String>,
}

impl MemorySite {
    pub fn page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    /// A site where page `i` links to pages `2i+1` and `2i+2` (and back to the root)
    pub fn binary_tree(base: &str, size: usize) -> Self {
        let mut site = Self::default();
        for i in 0..size {
            let url = if i == 0 {
                format!("{}/", base)
            } else {
                format!("{}/p{}", base, i)
            };
            let body = html_page(
                &format!("Page {}", i),
                &format!("This is page number {} of the tree.", i),
                &["/", &format!("/p{}", 2 * i + 1), &format!("/p{}", 2 * i + 2)],
            );
            site = site.page(&url, body);
        }
        site
    }
}

#[async_trait]
impl Fetcher for MemorySite {
    async fn fetch(
        &self,
        url: &Url,
        _timeout: Duration,
        _options: &FetchOptions,
    ) -> Result<RawPage, FetchError> {
        match self.pages.get(url.as_str()) {
            Some(body) => Ok(RawPage {
                body: body.clone(),
                final_url: url.clone(),
                status_code: Some(200),
                elapsed: Duration::from_millis(1),
            }),
            None => Err(FetchError::Http(404)),
        }
    }

    async fn fetch_text(
        &self,
        _url: &Url,
        _timeout: Duration,
        _options: &FetchOptions,
    ) -> Result<String, FetchError> {
        Err(FetchError::Http(404))
    }

    fn engine(&self) -> FetchEngine {
        FetchEngine::Plain
    }
}

/// Builds a small HTML document with a title, one paragraph and some links
pub fn html_page(title: &str, text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">more</a> ", href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{}</p><nav>{}</nav></body></html>",
        title, text, anchors
    )
}
