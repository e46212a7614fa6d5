use thiserror::Error;

/// Errors from the scrape-proxy client.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, body read, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy answered with a non-success status
    #[error("proxy returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The configured proxy base URL is not usable
    #[error("invalid proxy base URL: {0}")]
    BaseUrl(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
