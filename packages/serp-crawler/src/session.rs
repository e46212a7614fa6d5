//! Browser session: a single navigable tab behind a trait seam.
//!
//! The crawl loop only depends on [`BrowserSession`], so tests script a mock
//! session and production uses [`ChromiumSession`] over chromiumoxide (CDP).

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

use crate::error::{SessionError, SessionResult};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// One browser tab, exclusively owned by a crawl for its lifetime.
#[async_trait]
pub trait BrowserSession: Send {
    /// Load `url`, waiting until the page load settles or `timeout` elapses.
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> SessionResult<()>;

    /// All non-empty `href` values of elements matching `selector`.
    ///
    /// Raw strings as rendered; deduplication is the caller's concern.
    async fn extract_links(&mut self, selector: &str) -> SessionResult<Vec<String>>;

    /// Whether at least one element matches `selector`.
    async fn has_element(&mut self, selector: &str) -> SessionResult<bool>;

    /// Release the tab. Errors are logged, never propagated.
    async fn close(&mut self);
}

/// Production session over a headless Chrome tab.
///
/// `launch()` is the only way to obtain one, so a crawl can never acquire the
/// same tab twice. Request interception aborts image/stylesheet/font/media
/// requests to keep SERP navigations cheap.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launch headless Chrome, open a tab, and enable resource blocking.
    pub async fn launch() -> SessionResult<Self> {
        let config = BrowserConfig::builder()
            .args(vec![
                "--disable-gpu".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-background-networking".to_string(),
                "--disable-extensions".to_string(),
                format!("--user-agent={USER_AGENT}"),
            ])
            .build()
            .map_err(|e| SessionError::Browser(e.into()))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SessionError::Browser(Box::new(e)))?;

        // Drive the CDP message loop. Chrome emits messages chromiumoxide
        // cannot always deserialize; those are safe to skip.
        let handler_task = tokio::spawn(async move {
            while let Some(result) = handler.next().await {
                if let Err(e) = result {
                    let msg = e.to_string();
                    if msg.contains("data did not match any variant of untagged enum Message") {
                        continue;
                    }
                    tracing::debug!(error = %e, "CDP handler error");
                    if msg.contains("connection closed")
                        || msg.contains("websocket")
                        || msg.contains("io error")
                    {
                        break;
                    }
                }
            }
            tracing::debug!("CDP handler task finished");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::Browser(Box::new(e)))?;

        Self::enable_resource_blocking(&page).await?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Intercept requests via the Fetch domain and abort non-essential
    /// resource kinds (image, stylesheet, font, media).
    async fn enable_resource_blocking(page: &Page) -> SessionResult<()> {
        page.execute(EnableParams::default())
            .await
            .map_err(|e| SessionError::Browser(Box::new(e)))?;

        let mut paused = page
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(|e| SessionError::Browser(Box::new(e)))?;

        let intercept_page = page.clone();
        tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let blocked = matches!(
                    &event.resource_type,
                    ResourceType::Image
                        | ResourceType::Stylesheet
                        | ResourceType::Font
                        | ResourceType::Media
                );

                let request_id = event.request_id.clone();
                let outcome = if blocked {
                    intercept_page
                        .execute(FailRequestParams::new(
                            request_id,
                            ErrorReason::BlockedByClient,
                        ))
                        .await
                        .map(|_| ())
                } else {
                    intercept_page
                        .execute(ContinueRequestParams::new(request_id))
                        .await
                        .map(|_| ())
                };

                // The tab may already be gone mid-flight; nothing to do.
                if let Err(e) = outcome {
                    tracing::trace!(error = %e, "request interception reply failed");
                }
            }
        });

        Ok(())
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> SessionResult<()> {
        tracing::debug!(url = %url, timeout_ms = timeout.as_millis() as u64, "navigating");

        let load = async {
            self.page.goto(url.as_str()).await?;
            self.page.wait_for_navigation().await?;
            Ok::<(), CdpError>(())
        };

        match tokio::time::timeout(timeout, load).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(SessionError::Navigation {
                url: url.to_string(),
                source: Box::new(e),
            }),
            Err(_) => Err(SessionError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn extract_links(&mut self, selector: &str) -> SessionResult<Vec<String>> {
        let elements = match self.page.find_elements(selector).await {
            Ok(elements) => elements,
            Err(CdpError::NotFound) => return Ok(Vec::new()),
            Err(e) => {
                return Err(SessionError::Extraction {
                    selector: selector.to_string(),
                    source: Box::new(e),
                })
            }
        };

        let mut links = Vec::with_capacity(elements.len());
        for element in elements {
            let href = element
                .attribute("href")
                .await
                .map_err(|e| SessionError::Extraction {
                    selector: selector.to_string(),
                    source: Box::new(e),
                })?;
            if let Some(href) = href {
                if !href.is_empty() {
                    links.push(href);
                }
            }
        }
        Ok(links)
    }

    async fn has_element(&mut self, selector: &str) -> SessionResult<bool> {
        match self.page.find_element(selector).await {
            Ok(_) => Ok(true),
            Err(CdpError::NotFound) => Ok(false),
            Err(e) => Err(SessionError::Extraction {
                selector: selector.to_string(),
                source: Box::new(e),
            }),
        }
    }

    async fn close(&mut self) {
        // Page::close consumes the page; the handle is cheap to clone.
        if let Err(e) = self.page.clone().close().await {
            tracing::debug!(error = %e, "page close error (ignored)");
        }
        if let Err(e) = self.browser.close().await {
            tracing::debug!(error = %e, "browser close error (ignored)");
        }
        self.handler_task.abort();
    }
}
