//! Error type for the browser driver abstraction.

use thiserror::Error;

/// Result type alias using [`DriverError`].
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors surfaced by [`crate::BrowserDriver`]/[`crate::PageHandle`]
/// implementations.
///
/// Kept separate from `domsentry_types::AuditError` because this crate
/// has no opinion on how its caller should propagate failures — the
/// page preparer and detectors translate these into their own error
/// kinds.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The browser process could not be launched.
    #[error("failed to launch browser: {0}")]
    Launch(String),
    /// A new page/tab could not be created.
    #[error("failed to create page: {0}")]
    PageCreation(String),
    /// Navigation failed or timed out.
    #[error("navigation failed: {0}")]
    Navigation(String),
    /// Script evaluation crashed or returned a non-JSON result.
    #[error("script evaluation failed: {0}")]
    Evaluation(String),
    /// Waiting for network idle timed out.
    #[error("timed out waiting for idle: {0}")]
    Timeout(String),
    /// The page or browser could not be closed cleanly.
    #[error("failed to close: {0}")]
    Close(String),
    /// The requested capability isn't supported by this engine.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}
