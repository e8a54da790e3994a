//! Chrome DevTools Protocol engine, backed by `spider_chrome` (imported
//! as `chromiumoxide`, see this crate's Cargo.toml).
//!
//! Grounded on `riptide-browser/src/cdp/chromiumoxide_impl.rs` and
//! `riptide-headless/src/launcher.rs`: launch a browser, spawn its CDP
//! event-handling future, and wrap `Page` behind the trait-only
//! abstraction in [`crate::traits`].

use crate::error::{DriverError, Result};
use crate::traits::{
    BrowserDriver, ConsoleHandler, ConsoleLevel, ConsoleMessage, NavigateOutcome, PageErrorHandler,
    PageHandle,
};
use async_trait::async_trait;
use chromiumoxide::cdp::js_protocol::runtime::{EventConsoleApiCalled, EventExceptionThrown};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, warn};

/// Reads the HTTP status of the top-level navigation off the Navigation
/// Timing Level 2 API, when the browser exposes it. Falls back to
/// `null` on older engines — callers treat a missing status as "assume
/// ok" rather than failing the whole navigation over an unsupported
/// API, and only reject the navigation when a status actually came
/// back non-ok.
const STATUS_PROBE_SCRIPT: &str = r#"
(() => {
  const entries = performance.getEntriesByType('navigation');
  if (!entries.length) return null;
  const status = entries[0].responseStatus;
  return typeof status === 'number' && status > 0 ? status : null;
})()
"#;

/// A running headless Chrome instance.
pub struct CdpBrowser {
    browser: Browser,
}

impl CdpBrowser {
    /// Launch a new headless Chrome instance.
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        // chromiumoxide requires its CDP event loop to be polled
        // continuously for the browser handle to remain responsive.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    warn!(error = %err, "chromium CDP handler error");
                }
            }
        });

        Ok(Self { browser })
    }
}

#[async_trait]
impl BrowserDriver for CdpBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>> {
        debug!("creating new page");
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::PageCreation(e.to_string()))?;
        Ok(Box::new(CdpPage::new(page)))
    }

    async fn close(&self) -> Result<()> {
        debug!("closing browser");
        Ok(())
    }
}

/// A single tab, wrapping `chromiumoxide::Page`.
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl PageHandle for CdpPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<NavigateOutcome> {
        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| DriverError::Navigation(format!("navigation to {url} timed out")))?
            .map_err(|e| DriverError::Navigation(e.to_string()))?;

        self.wait_for_idle(timeout).await?;

        let status = self
            .evaluate(STATUS_PROBE_SCRIPT)
            .await
            .ok()
            .and_then(|v| v.as_u64())
            .map(|s| s as u16);
        let ok = status.map(|s| (200..400).contains(&s)).unwrap_or(true);
        Ok(NavigateOutcome { status, ok })
    }

    async fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        self.page
            .set_viewport(chromiumoxide::page::Viewport {
                width,
                height,
                ..Default::default()
            })
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| DriverError::Evaluation(e.to_string()))
    }

    async fn wait_for_idle(&self, timeout: Duration) -> Result<()> {
        tokio::time::timeout(timeout, self.page.wait_for_navigation())
            .await
            .map_err(|_| DriverError::Timeout("network idle".into()))?
            .map_err(|e| DriverError::Timeout(e.to_string()))?;
        Ok(())
    }

    fn on_console(&self, handler: ConsoleHandler) {
        let page = self.page.clone();
        tokio::spawn(async move {
            let Ok(mut events) = page.event_listener::<EventConsoleApiCalled>().await else {
                return;
            };
            while let Some(event) = events.next().await {
                let text = event
                    .args
                    .iter()
                    .filter_map(|a| a.value.as_ref().map(|v| v.to_string()))
                    .collect::<Vec<_>>()
                    .join(" ");
                let level = match event.r#type.as_ref() {
                    "error" => ConsoleLevel::Error,
                    "warning" => ConsoleLevel::Warning,
                    _ => ConsoleLevel::Log,
                };
                handler(ConsoleMessage {
                    level,
                    text,
                    source: None,
                });
            }
        });
    }

    fn on_page_error(&self, handler: PageErrorHandler) {
        let page = self.page.clone();
        tokio::spawn(async move {
            let Ok(mut events) = page.event_listener::<EventExceptionThrown>().await else {
                return;
            };
            while let Some(event) = events.next().await {
                handler(event.exception_details.text.clone());
            }
        });
    }

    async fn close(&self) -> Result<()> {
        self.page
            .close()
            .await
            .map_err(|e| DriverError::Close(e.to_string()))
    }
}
