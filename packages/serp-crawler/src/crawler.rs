//! The paginated crawl loop.
//!
//! Drives one [`BrowserSession`] across up to `max_pages` result pages for a
//! single query, collecting a deduplicated URL set. The per-page flow is an
//! explicit phase machine: `Fetching -> Extracting -> CheckNext ->
//! {Fetching | Done}`.
//!
//! A crawl never discards progress: `crawl()` returns a [`CrawlReport`]
//! carrying every URL collected before the first error, alongside the typed
//! error itself. Retry policy belongs to callers wrapping the whole crawl;
//! this loop fails on the first navigation, extraction, or persistence error.

use indexmap::IndexSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::backoff::JitterPolicy;
use crate::engine::SearchEngine;
use crate::error::{CrawlError, CrawlResult};
use crate::session::BrowserSession;
use crate::snapshot::SnapshotWriter;

/// One crawl invocation: a single term against a single engine.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub search_term: String,
    pub engine: SearchEngine,
    pub max_pages: u32,
    /// When set, the full URL list is snapshotted after every page.
    pub snapshot_path: Option<PathBuf>,
    pub navigation_timeout: Duration,
    pub jitter: JitterPolicy,
}

impl CrawlRequest {
    /// Create a request with defaults: 10 pages, 30 s navigation timeout,
    /// 1-3 s inter-page jitter, no snapshots.
    pub fn new(search_term: impl Into<String>, engine: SearchEngine) -> Self {
        Self {
            search_term: search_term.into(),
            engine,
            max_pages: 10,
            snapshot_path: None,
            navigation_timeout: Duration::from_secs(30),
            jitter: JitterPolicy::default(),
        }
    }

    /// Set the page bound (clamped to at least 1).
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Persist the deduplicated URL list after each page.
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Set the per-navigation deadline.
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set the inter-page delay policy.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }
}

/// What a crawl produced, complete or not.
#[derive(Debug)]
pub struct CrawlReport {
    /// Deduplicated URLs in discovery order.
    pub urls: Vec<String>,
    /// Fully completed result pages.
    pub pages_visited: u32,
    /// The error that ended the crawl early, if any.
    pub error: Option<CrawlError>,
}

impl CrawlReport {
    /// True when the crawl reached a normal stop condition.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-page phases of the crawl machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fetching,
    Extracting,
    CheckNext,
    Done,
}

/// Mutable crawl state, owned by the loop for its lifetime.
struct CrawlState {
    /// 1-based index of the page currently being visited.
    page_index: u32,
    /// Never shrinks; exact-string uniqueness, insertion order kept.
    collected: IndexSet<String>,
    has_more: bool,
}

/// Drives a browser session across paginated search results.
pub struct PaginatedCrawler<B: BrowserSession> {
    session: B,
}

impl<B: BrowserSession> PaginatedCrawler<B> {
    pub fn new(session: B) -> Self {
        Self { session }
    }

    /// Run the crawl to completion or first error.
    ///
    /// The session is closed on every exit path before this returns.
    pub async fn crawl(mut self, request: &CrawlRequest) -> CrawlReport {
        let mut state = CrawlState {
            page_index: 1,
            collected: IndexSet::new(),
            has_more: true,
        };

        let outcome = self.run(request, &mut state).await;
        self.session.close().await;

        let pages_visited = state.page_index - 1;
        match &outcome {
            Ok(()) => tracing::info!(
                pages_visited,
                urls = state.collected.len(),
                "crawl completed"
            ),
            Err(e) => tracing::warn!(
                pages_visited,
                urls = state.collected.len(),
                error = %e,
                "crawl ended early, returning partial result"
            ),
        }

        CrawlReport {
            urls: state.collected.into_iter().collect(),
            pages_visited,
            error: outcome.err(),
        }
    }

    async fn run(&mut self, request: &CrawlRequest, state: &mut CrawlState) -> CrawlResult<()> {
        let profile = request.engine.profile();
        let snapshot = request.snapshot_path.as_ref().map(SnapshotWriter::new);

        let mut phase = Phase::Fetching;
        loop {
            phase = match phase {
                Phase::Fetching => {
                    let url = request
                        .engine
                        .search_url(&request.search_term, state.page_index);
                    tracing::info!(page = state.page_index, url = %url, "fetching result page");
                    self.session
                        .navigate(&url, request.navigation_timeout)
                        .await?;
                    Phase::Extracting
                }

                Phase::Extracting => {
                    let links = self
                        .session
                        .extract_links(profile.result_link_selector)
                        .await?;
                    let before = state.collected.len();
                    state.collected.extend(links);
                    tracing::info!(
                        page = state.page_index,
                        new_urls = state.collected.len() - before,
                        total_urls = state.collected.len(),
                        "links extracted"
                    );

                    if let Some(writer) = &snapshot {
                        let urls: Vec<&str> =
                            state.collected.iter().map(String::as_str).collect();
                        writer
                            .write(&urls)
                            .await
                            .map_err(|source| CrawlError::Persistence {
                                path: writer.path().to_path_buf(),
                                source,
                            })?;
                    }
                    Phase::CheckNext
                }

                Phase::CheckNext => {
                    state.has_more = self
                        .session
                        .has_element(profile.next_page_selector)
                        .await?;
                    // This page is complete regardless of what comes next.
                    state.page_index += 1;

                    if !state.has_more {
                        tracing::info!("no next-page control, stopping");
                        Phase::Done
                    } else if state.page_index > request.max_pages {
                        Phase::Done
                    } else {
                        let delay = request.jitter.sample();
                        if !delay.is_zero() {
                            tracing::debug!(delay_ms = delay.as_millis() as u64, "inter-page delay");
                            tokio::time::sleep(delay).await;
                        }
                        Phase::Fetching
                    }
                }

                Phase::Done => break,
            };
        }

        Ok(())
    }
}
