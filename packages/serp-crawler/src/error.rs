//! Typed errors for the crawl pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match on
//! the failure kind instead of string-parsing a message.

use std::path::PathBuf;
use thiserror::Error;

/// An engine name outside the supported set was requested.
///
/// Raised before any navigation happens, so a misconfigured crawl fails fast.
#[derive(Debug, Clone, Error)]
#[error("unknown search engine: {name} (supported: google, bing)")]
pub struct UnknownEngineError {
    pub name: String,
}

/// Errors raised by a browser session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Browser launch or tab acquisition failed
    #[error("browser error: {0}")]
    Browser(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Page load did not settle within the deadline
    #[error("navigation timed out after {timeout_ms}ms: {url}")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    /// Page load failed outright (DNS, connection refused, ...)
    #[error("navigation failed: {url}")]
    Navigation {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Selector evaluation failed (e.g. detached frame)
    #[error("link extraction failed for selector {selector:?}")]
    Extraction {
        selector: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors that end a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Bad engine configuration
    #[error(transparent)]
    Engine(#[from] UnknownEngineError),

    /// Navigation or extraction failure from the browser session
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Snapshot write failed
    #[error("failed to persist snapshot to {path:?}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;
