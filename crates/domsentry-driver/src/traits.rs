//! Trait-only browser abstraction.
//!
//! This module contains ONLY trait and plain-data definitions — no
//! concrete CDP types. Concrete engines live in [`crate::cdp`]. The
//! split mirrors `riptide-browser/src/abstraction/mod.rs`'s rule that
//! the abstraction layer never leaks engine-specific types.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Severity of a captured console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    /// `console.log`/`console.debug`/`console.info`.
    Log,
    /// `console.warn`.
    Warning,
    /// `console.error`, or an uncaught page exception.
    Error,
}

/// A single console or page-error message captured by the driver.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    /// Whether this came from `console.*` or an uncaught page error.
    pub level: ConsoleLevel,
    /// The message text.
    pub text: String,
    /// Script/resource URL the message originated from, if known.
    pub source: Option<String>,
}

impl fmt::Display for ConsoleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Callback invoked for each console message, installed via
/// [`PageHandle::on_console`].
pub type ConsoleHandler = Arc<dyn Fn(ConsoleMessage) + Send + Sync>;

/// Callback invoked for each uncaught page error, installed via
/// [`PageHandle::on_page_error`].
pub type PageErrorHandler = Arc<dyn Fn(String) + Send + Sync>;

/// The outcome of a navigation.
#[derive(Debug, Clone)]
pub struct NavigateOutcome {
    /// HTTP status code of the main document response, when the engine
    /// can report one.
    pub status: Option<u16>,
    /// Whether the response was present and in the 2xx/3xx range.
    pub ok: bool,
}

/// A single browser tab/page.
///
/// Covers navigation, viewport sizing, script evaluation, console/error
/// listeners, and closing; opening a page is realized as
/// [`BrowserDriver::new_page`] (create a blank page, so listeners can be
/// installed before navigation) followed by [`PageHandle::goto`].
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigate to `url`, waiting for network idle up to `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<NavigateOutcome>;

    /// Set the viewport size.
    async fn set_viewport(&self, width: u32, height: u32) -> Result<()>;

    /// Evaluate `script` in page context and return its JSON result.
    async fn evaluate(&self, script: &str) -> Result<Value>;

    /// Block until the page has been network-idle for a quiet period,
    /// up to `timeout`.
    async fn wait_for_idle(&self, timeout: Duration) -> Result<()>;

    /// Install a console message listener. May be called before or
    /// after navigation; engines should deliver messages from whenever
    /// the listener was installed onward.
    fn on_console(&self, handler: ConsoleHandler);

    /// Install an uncaught page error listener.
    fn on_page_error(&self, handler: PageErrorHandler);

    /// Close the page, releasing any engine-side resources.
    async fn close(&self) -> Result<()>;
}

/// A browser process capable of creating pages.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Create a new, blank page/tab.
    async fn new_page(&self) -> Result<Box<dyn PageHandle>>;

    /// Close the browser and all its pages.
    async fn close(&self) -> Result<()>;
}
