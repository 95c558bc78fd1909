//! Crawler coordinator - main traversal logic
//!
//! The coordinator owns everything mutable about a traversal:
//! - The frontier and visited set
//! - The page budget and the dispatch order
//! - Robots.txt decisions and politeness spacing
//! - Deadline and cancellation handling
//! - Report assembly
//!
//! Worker tasks only fetch. Extraction, scoring and link discovery run on the
//! coordinator as results come back, so no lock guards the frontier.

use crate::config::{CrawlConfig, FetchOptions};
use crate::crawler::fetcher::{Fetcher, RawPage};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract;
use crate::report::{CrawlReport, ScoredPage};
use crate::robots::{fetch_robots, RobotsPolicy};
use crate::scoring::{score_with, ScoringRules};
use crate::state::TraversalState;
use crate::url::{normalize_url, parse_root_url, Scope};
use crate::{ConfigError, FetchError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Traversal settings that are not per-fetch options
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSettings {
    /// Fetches allowed in flight at once
    pub concurrency: usize,

    /// Minimum spacing between two dispatches
    pub delay: Duration,

    /// Overall time limit; the report is returned `Aborted` when it passes
    pub deadline: Option<Duration>,

    pub respect_robots: bool,

    /// Host patterns in scope besides the root host
    pub extra_hosts: Vec<String>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            concurrency: 1,
            delay: Duration::ZERO,
            deadline: None,
            respect_robots: true,
            extra_hosts: Vec::new(),
        }
    }
}

impl CrawlSettings {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            delay: Duration::from_millis(config.delay_ms),
            deadline: config.deadline_secs.map(Duration::from_secs),
            respect_robots: config.respect_robots,
            extra_hosts: config.extra_hosts.clone(),
        }
    }
}

/// Outcome of one fetch task
struct FetchOutcome {
    seq: usize,
    url: Url,
    elapsed: Duration,
    result: Result<RawPage, FetchError>,
}

/// Main traversal coordinator
pub struct Coordinator {
    fetcher: Arc<dyn Fetcher>,
    options: Arc<FetchOptions>,
    settings: CrawlSettings,
    rules: Arc<ScoringRules>,
    state: TraversalState,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator in the `Idle` state
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Engine used for every page and for robots.txt
    /// * `options` - Per-fetch options (timeout, user agent, browser settings)
    /// * `settings` - Traversal settings
    pub fn new(fetcher: Arc<dyn Fetcher>, options: FetchOptions, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            options: Arc::new(options),
            settings,
            rules: Arc::new(ScoringRules::default()),
            state: TraversalState::Idle,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the traversal when cancelled
    ///
    /// Pages already scored are kept; the report comes back `Aborted`.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Runs one traversal from `root_url`
    ///
    /// # Flow
    ///
    /// 1. Validate the root URL and the page budget (`ConfigError` before any fetch)
    /// 2. Load robots.txt of the root origin when enabled
    /// 3. Loop until the frontier and the worker pool are both empty, or the budget
    ///    is spent:
    ///    a. Dispatch queued URLs while workers and budget allow
    ///    b. Wait for a fetch to finish, the deadline, or cancellation
    ///    c. Extract, score and record the page (or a degraded entry)
    ///    d. Enqueue in-scope links not seen before
    /// 4. Sort entries by dispatch order and finish the report
    ///
    /// Each call is an independent traversal; nothing carries over from a
    /// previous call except the cancellation token.
    pub async fn crawl(
        &mut self,
        root_url: &str,
        max_pages: usize,
    ) -> Result<CrawlReport, ConfigError> {
        self.state = TraversalState::Idle;
        self.enter(TraversalState::Running);

        let (root, scope) = match self.validate(root_url, max_pages) {
            Ok(validated) => validated,
            Err(e) => {
                tracing::error!("Refusing to crawl {}: {}", root_url, e);
                self.enter(TraversalState::Aborted);
                return Err(e);
            }
        };

        tracing::info!(
            "Starting crawl of {} (max {} pages, {} engine, concurrency {})",
            root,
            max_pages,
            self.fetcher.engine(),
            self.settings.concurrency
        );

        let mut report = CrawlReport::new(root.as_str(), self.fetcher.engine());
        let started = Instant::now();

        let deadline = self.settings.deadline.map(|d| started + d);
        let deadline_reached = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline_reached);

        let mut aborted = false;
        let robots = if self.settings.respect_robots {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::warn!("Crawl cancelled while loading robots.txt");
                    aborted = true;
                    RobotsPolicy::allow_all()
                }
                _ = &mut deadline_reached => {
                    tracing::warn!("Crawl deadline reached while loading robots.txt");
                    aborted = true;
                    RobotsPolicy::allow_all()
                }
                policy = fetch_robots(
                    self.fetcher.as_ref(),
                    &root,
                    self.options.timeout_duration(),
                    &self.options,
                ) => policy,
            }
        } else {
            RobotsPolicy::allow_all()
        };

        let delay = match robots.crawl_delay(&self.options.user_agent) {
            Some(crawl_delay) if crawl_delay > self.settings.delay => {
                tracing::info!("Honoring robots.txt crawl delay of {:?}", crawl_delay);
                crawl_delay
            }
            _ => self.settings.delay,
        };

        let mut frontier = Frontier::with_root(root);
        let mut in_flight: JoinSet<FetchOutcome> = JoinSet::new();
        let mut entries: Vec<(usize, ScoredPage)> = Vec::new();
        let mut dispatched = 0usize;
        let mut last_dispatch: Option<Instant> = None;

        'crawl: while !aborted {
            while in_flight.len() < self.settings.concurrency.max(1) && dispatched < max_pages {
                if self.cancel.is_cancelled() {
                    aborted = true;
                    break 'crawl;
                }

                let Some(url) = frontier.next() else {
                    break;
                };

                if !robots.is_allowed(url.as_str(), &self.options.user_agent) {
                    tracing::info!("URL {} disallowed by robots.txt", url);
                    report.robots_blocked.push(url.to_string());
                    continue;
                }

                if let Some(last) = last_dispatch {
                    let ready = last + delay;
                    if ready > Instant::now() {
                        tokio::select! {
                            biased;
                            _ = self.cancel.cancelled() => {
                                aborted = true;
                                break 'crawl;
                            }
                            _ = &mut deadline_reached => {
                                tracing::warn!("Crawl deadline reached");
                                aborted = true;
                                break 'crawl;
                            }
                            _ = tokio::time::sleep_until(ready) => {}
                        }
                    }
                }

                tracing::debug!("Dispatching fetch #{} for {}", dispatched, url);
                self.spawn_fetch(&mut in_flight, dispatched, url);
                dispatched += 1;
                last_dispatch = Some(Instant::now());
            }

            if in_flight.is_empty() {
                break;
            }

            let joined = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::warn!("Crawl cancelled");
                    aborted = true;
                    break;
                }
                _ = &mut deadline_reached => {
                    tracing::warn!("Crawl deadline reached");
                    aborted = true;
                    break;
                }
                joined = in_flight.join_next() => joined,
            };

            let outcome = match joined {
                Some(Ok(outcome)) => outcome,
                Some(Err(e)) => {
                    tracing::error!("Fetch task failed: {}", e);
                    continue;
                }
                None => break,
            };

            let entry = self.process(outcome.url, outcome.elapsed, outcome.result, &scope, &mut frontier);
            entries.push((outcome.seq, entry));

            if entries.len() % 10 == 0 {
                let elapsed = started.elapsed();
                tracing::info!(
                    "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                    entries.len(),
                    frontier.pending(),
                    entries.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
                );
            }
        }

        if !in_flight.is_empty() {
            tracing::debug!("Aborting {} in-flight fetches", in_flight.len());
            in_flight.abort_all();
        }

        entries.sort_by_key(|(seq, _)| *seq);
        report.pages = entries.into_iter().map(|(_, page)| page).collect();
        report.visited = frontier.visited().iter().cloned().collect();

        let final_state = if aborted {
            TraversalState::Aborted
        } else {
            TraversalState::Completed
        };
        self.enter(final_state);
        report.finish(final_state, frontier.pending());

        tracing::info!(
            "Crawl {}: {} pages ({} degraded) in {:?}, {} still queued",
            final_state,
            report.pages.len(),
            report.degraded_pages().count(),
            started.elapsed(),
            report.pending
        );

        Ok(report)
    }

    fn validate(&self, root_url: &str, max_pages: usize) -> Result<(Url, Scope), ConfigError> {
        let root = parse_root_url(root_url)?;
        if max_pages == 0 {
            return Err(ConfigError::InvalidMaxPages(max_pages));
        }
        let scope = Scope::with_patterns(&root, &self.settings.extra_hosts)?;
        Ok((root, scope))
    }

    fn spawn_fetch(&self, in_flight: &mut JoinSet<FetchOutcome>, seq: usize, url: Url) {
        let fetcher = Arc::clone(&self.fetcher);
        let options = Arc::clone(&self.options);

        in_flight.spawn(async move {
            let started = Instant::now();
            let result = fetcher
                .fetch(&url, options.timeout_duration(), &options)
                .await;
            FetchOutcome {
                seq,
                url,
                elapsed: started.elapsed(),
                result,
            }
        });
    }

    /// Turns a fetch result into a report entry and grows the frontier
    fn process(
        &self,
        url: Url,
        elapsed: Duration,
        result: Result<RawPage, FetchError>,
        scope: &Scope,
        frontier: &mut Frontier,
    ) -> ScoredPage {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                return ScoredPage::degraded(url.as_str(), &e, elapsed);
            }
        };

        if raw.final_url != url {
            tracing::debug!("{} redirected to {}", url, raw.final_url);
            if let Ok(landed) = normalize_url(raw.final_url.as_str()) {
                frontier.mark_visited(&landed);
            }
        }

        let page = extract(&raw.body, &raw.final_url).with_fetch(
            url.as_str(),
            raw.status_code,
            raw.elapsed,
        );

        let mut discovered = 0;
        for link in &page.links {
            match normalize_url(link) {
                Ok(normalized) if scope.allows(&normalized) => {
                    if frontier.push(normalized) {
                        discovered += 1;
                    }
                }
                Ok(normalized) => tracing::trace!("Out of scope: {}", normalized),
                Err(e) => tracing::trace!("Skipping link {}: {}", link, e),
            }
        }

        let scored = score_with(page, &self.rules);
        tracing::debug!(
            "Scored {}: quality {:.2}, {} words, {} new links",
            url,
            scored.quality_score,
            scored.word_count(),
            discovered
        );
        scored
    }

    fn enter(&mut self, next: TraversalState) {
        if let Err(e) = self.state.transition(next) {
            tracing::error!("{}", e);
        }
    }
}
