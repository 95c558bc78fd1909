//! Fetch capability
//!
//! This module defines the [`Fetcher`] trait the traversal depends on and its
//! plain HTTP engine:
//! - Building HTTP clients with the configured user agent
//! - GET requests following redirects
//! - Error classification into [`FetchError`]
//!
//! The scripted-browser engine lives in [`super::browser`]. Neither engine retries:
//! a failed fetch becomes a degraded report entry.

use crate::config::{FetchEngine, FetchOptions};
use crate::crawler::browser::BrowserFetcher;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Maximum redirect hops followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// A successfully retrieved document
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    /// Response body
    pub body: String,

    /// URL after redirects
    pub final_url: Url,

    /// HTTP status, unknown for the scripted engine
    pub status_code: Option<u16>,

    /// Time spent fetching
    pub elapsed: Duration,
}

/// Retrieves documents for the traversal
///
/// Implementations must be safe to share between worker tasks; the coordinator
/// holds one behind an `Arc`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page, attempting exactly once
    async fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
        options: &FetchOptions,
    ) -> Result<RawPage, FetchError>;

    /// Fetches a plain-text resource such as robots.txt
    async fn fetch_text(
        &self,
        url: &Url,
        timeout: Duration,
        options: &FetchOptions,
    ) -> Result<String, FetchError> {
        self.fetch(url, timeout, options).await.map(|page| page.body)
    }

    /// Engine reported in the crawl report
    fn engine(&self) -> FetchEngine;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `options` - Fetch options carrying the user agent
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(options: &FetchOptions) -> Result<Client, reqwest::Error> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("en-US,en;q=0.5"),
    );

    Client::builder()
        .user_agent(options.user_agent.as_str())
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Plain HTTP engine
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let client = build_http_client(options).map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get(&self, url: &Url, timeout: Duration) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
        _options: &FetchOptions,
    ) -> Result<RawPage, FetchError> {
        let started = Instant::now();
        let response = self.get(url, timeout).await?;

        let status_code = response.status().as_u16();
        let final_url = response.url().clone();
        let body = response.text().await.map_err(classify_error)?;

        Ok(RawPage {
            body,
            final_url,
            status_code: Some(status_code),
            elapsed: started.elapsed(),
        })
    }

    async fn fetch_text(
        &self,
        url: &Url,
        timeout: Duration,
        _options: &FetchOptions,
    ) -> Result<String, FetchError> {
        let response = self.get(url, timeout).await?;
        response.text().await.map_err(classify_error)
    }

    fn engine(&self) -> FetchEngine {
        FetchEngine::Plain
    }
}

/// Maps a transport error onto the fetch failure kinds
///
/// | Condition | Result |
/// |-----------|--------|
/// | Timeout | `Timeout` |
/// | Connection refused / unreachable | `ConnectionRefused` |
/// | Error status surfaced by reqwest | `Http(status)` |
/// | Anything else (TLS, redirects, decoding) | `Network` |
pub(crate) fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::ConnectionRefused
    } else if let Some(status) = error.status() {
        FetchError::Http(status.as_u16())
    } else {
        FetchError::Network(error.to_string())
    }
}

/// Selects the engine named in `options`
pub fn build_fetcher(options: &FetchOptions) -> Result<Arc<dyn Fetcher>, FetchError> {
    Ok(match options.engine {
        FetchEngine::Plain => Arc::new(HttpFetcher::new(options)?),
        FetchEngine::Scripted => Arc::new(BrowserFetcher::new(options)?),
    })
}
