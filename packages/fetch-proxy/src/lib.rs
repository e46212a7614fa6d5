//! Pure scrape-proxy REST client.
//!
//! A minimal client for an HTTP scrape-proxy service (one GET per target
//! URL, rendered/raw text body back). Fan-out over many URLs is bounded and
//! failures stay isolated per URL: one dead site never cancels the batch.
//!
//! # Example
//!
//! ```rust,ignore
//! use fetch_proxy::FetchProxyClient;
//!
//! let client = FetchProxyClient::new("https://proxy.example.com/render")
//!     .with_api_key("secret");
//!
//! for outcome in client.fetch_all(&urls, 8).await {
//!     match outcome.result {
//!         Ok(body) => println!("{}: {} bytes", outcome.url, body.len()),
//!         Err(e) => eprintln!("{}: {}", outcome.url, e),
//!     }
//! }
//! ```

pub mod error;

pub use error::{FetchError, Result};

use futures::stream::{self, StreamExt};
use std::time::Duration;

/// Result of fetching one URL through the proxy.
#[derive(Debug)]
pub struct FetchOutcome {
    pub url: String,
    pub result: Result<String>,
}

/// Client for a scrape-proxy endpoint addressed as `{base}?url={target}`.
pub struct FetchProxyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl FetchProxyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("default reqwest client config is valid"),
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Attach the proxy's API key (sent as an `api_key` query parameter).
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Swap in a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn proxied_url(&self, target: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| FetchError::BaseUrl(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                pairs.append_pair("api_key", key);
            }
            pairs.append_pair("url", target);
        }
        Ok(url)
    }

    /// Fetch one URL's text body through the proxy.
    pub async fn fetch_text(&self, target: &str) -> Result<String> {
        let url = self.proxied_url(target)?;
        tracing::debug!(target, "proxy fetch starting");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: target.to_string(),
            });
        }

        let body = resp.text().await?;
        tracing::debug!(target, bytes = body.len(), "proxy fetch complete");
        Ok(body)
    }

    /// Fetch many URLs with at most `concurrency` requests in flight.
    ///
    /// Always returns one [`FetchOutcome`] per input URL; order follows
    /// completion, not input.
    pub async fn fetch_all(&self, targets: &[String], concurrency: usize) -> Vec<FetchOutcome> {
        let concurrency = concurrency.max(1);
        tracing::info!(urls = targets.len(), concurrency, "proxy fan-out starting");

        let outcomes: Vec<FetchOutcome> = stream::iter(targets.iter().cloned())
            .map(|url| async move {
                let result = self.fetch_text(&url).await;
                if let Err(e) = &result {
                    tracing::warn!(url = %url, error = %e, "proxy fetch failed");
                }
                FetchOutcome { url, result }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let failures = outcomes.iter().filter(|o| o.result.is_err()).count();
        tracing::info!(
            urls = outcomes.len(),
            failures,
            "proxy fan-out complete"
        );
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxied_url_carries_target_and_key() {
        let client = FetchProxyClient::new("https://proxy.example.com/render")
            .with_api_key("k123");
        let url = client.proxied_url("https://target.example/page?a=1").unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("api_key".into(), "k123".into())));
        assert!(pairs.contains(&("url".into(), "https://target.example/page?a=1".into())));
    }

    #[test]
    fn proxied_url_without_key_omits_parameter() {
        let client = FetchProxyClient::new("https://proxy.example.com/render");
        let url = client.proxied_url("https://target.example").unwrap();
        assert!(url.query_pairs().all(|(k, _)| k != "api_key"));
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let client = FetchProxyClient::new("not a url");
        let err = client.proxied_url("https://target.example").unwrap_err();
        assert!(matches!(err, FetchError::BaseUrl(_)));
    }
}
