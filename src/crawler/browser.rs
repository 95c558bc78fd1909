//! Scripted-browser engine
//!
//! Drives a headless Chrome through a WebDriver server so pages that render their
//! content with JavaScript can be read. Each fetch opens its own session and
//! closes it afterwards; no browser state leaks between pages.

use crate::config::{FetchEngine, FetchOptions};
use crate::crawler::fetcher::{build_http_client, classify_error, Fetcher, RawPage};
use crate::FetchError;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};
use url::Url;

/// WebDriver-backed fetcher
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    /// Serves plain-text resources without starting a browser
    http: reqwest::Client,
}

impl BrowserFetcher {
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let http = build_http_client(options).map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { http })
    }

    async fn connect(&self, options: &FetchOptions) -> Result<Client, FetchError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(chrome_capabilities(options));
        builder
            .connect(&options.webdriver_url)
            .await
            .map_err(|e| {
                FetchError::Script(format!(
                    "failed to connect to WebDriver at {}: {}",
                    options.webdriver_url, e
                ))
            })
    }

    async fn render(
        &self,
        client: &Client,
        url: &Url,
        timeout: Duration,
        options: &FetchOptions,
    ) -> Result<(String, Url), FetchError> {
        client.goto(url.as_str()).await.map_err(script_error)?;

        // Let page scripts populate the DOM
        tokio::time::sleep(options.wait_duration()).await;

        client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css("body"))
            .await
            .map_err(script_error)?;

        let source = client.source().await.map_err(script_error)?;
        let final_url = client.current_url().await.map_err(script_error)?;
        Ok((source, final_url))
    }
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
        options: &FetchOptions,
    ) -> Result<RawPage, FetchError> {
        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + timeout + options.wait_duration();

        let client = match tokio::time::timeout_at(deadline, self.connect(options)).await {
            Ok(connected) => connected?,
            Err(_) => return Err(FetchError::Timeout),
        };

        let rendered =
            tokio::time::timeout_at(deadline, self.render(&client, url, timeout, options)).await;

        if let Err(e) = client.close().await {
            tracing::debug!("Failed to close WebDriver session for {}: {}", url, e);
        }

        let (body, final_url) = match rendered {
            Ok(result) => result?,
            Err(_) => return Err(FetchError::Timeout),
        };

        Ok(RawPage {
            body,
            final_url,
            status_code: None,
            elapsed: started.elapsed(),
        })
    }

    async fn fetch_text(
        &self,
        url: &Url,
        timeout: Duration,
        _options: &FetchOptions,
    ) -> Result<String, FetchError> {
        let response = self
            .http
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }
        response.text().await.map_err(classify_error)
    }

    fn engine(&self) -> FetchEngine {
        FetchEngine::Scripted
    }
}

/// Chrome capabilities for a session
pub fn chrome_capabilities(options: &FetchOptions) -> Map<String, Value> {
    let mut args = vec![
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
        format!("--user-agent={}", options.user_agent),
    ];
    if options.headless {
        args.push("--headless".to_string());
    }

    let mut capabilities = Map::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    capabilities
}

fn script_error(error: fantoccini::error::CmdError) -> FetchError {
    FetchError::Script(error.to_string())
}
