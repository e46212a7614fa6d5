//! Paginated search-engine result crawler.
//!
//! Drives a single headless-browser tab across a bounded sequence of search
//! result pages for one query, accumulating a deduplicated URL set. The
//! browser runtime sits behind the [`BrowserSession`] trait so the crawl loop
//! can be tested against a scripted session.
//!
//! # Modules
//!
//! - [`engine`] - Search engine profiles (query URL templates, selectors)
//! - [`session`] - Browser session trait + chromiumoxide implementation
//! - [`crawler`] - The paginated crawl loop and its report
//! - [`snapshot`] - Atomic per-page URL snapshots
//! - [`backoff`] - Jittered inter-page delay policy
//!
//! # Usage
//!
//! ```rust,ignore
//! use serp_crawler::{ChromiumSession, CrawlRequest, PaginatedCrawler, SearchEngine};
//!
//! let engine = SearchEngine::from_name("google")?;
//! let request = CrawlRequest::new("b2b business uk", engine).with_max_pages(10);
//! let session = ChromiumSession::launch().await?;
//! let report = PaginatedCrawler::new(session).crawl(&request).await;
//! println!("{} urls across {} pages", report.urls.len(), report.pages_visited);
//! ```

pub mod backoff;
pub mod crawler;
pub mod engine;
pub mod error;
pub mod session;
pub mod snapshot;

// Re-export core types at crate root
pub use backoff::JitterPolicy;
pub use crawler::{CrawlReport, CrawlRequest, PaginatedCrawler};
pub use engine::{EngineProfile, SearchEngine, RESULTS_PER_PAGE};
pub use error::{CrawlError, SessionError, UnknownEngineError};
pub use session::{BrowserSession, ChromiumSession};
pub use snapshot::SnapshotWriter;
