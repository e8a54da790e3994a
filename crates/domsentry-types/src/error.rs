//! Error kinds shared across the domsentry workspace.

use thiserror::Error;

/// Result type alias using [`AuditError`].
pub type Result<T> = std::result::Result<T, AuditError>;

/// Error kinds produced while validating, crawling, and auditing.
///
/// Each variant corresponds to one documented failure mode and how it
/// propagates (see each variant's doc comment).
#[derive(Error, Debug)]
pub enum AuditError {
    /// CLI/config validation failed. Aborts the run with exit code 1
    /// before any browser work starts.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The browser driver could not be launched. Aborts the whole run.
    #[error("browser launch failed: {0}")]
    BrowserLaunchFailed(String),

    /// Navigation completed but the response was absent or non-ok.
    #[error("page load failed (status {status:?}): {message}")]
    PageLoadFailed {
        /// HTTP status code, when the driver could report one.
        status: Option<u16>,
        /// Human-readable detail.
        message: String,
    },

    /// The page preparer timed out waiting for the page to stabilize.
    #[error("page unresponsive: {0}")]
    PageUnresponsive(String),

    /// A driver-side script crashed. Recovered locally by the caller.
    #[error("script evaluation failed: {0}")]
    ScriptEvalFailed(String),

    /// One detector failed while running the analyzer pipeline. Never
    /// fatal for the page; the remaining detectors still run.
    #[error("detector '{detector}' failed: {message}")]
    DetectorFailed {
        /// Name of the detector that failed.
        detector: String,
        /// Human-readable detail.
        message: String,
    },

    /// Link extraction failed for a page. The page still completes,
    /// just without enqueued descendants.
    #[error("link extraction failed: {0}")]
    LinkExtractionFailed(String),

    /// A URL could not be normalized (not parseable as absolute, even
    /// after base resolution).
    #[error("failed to normalize url '{url}': {reason}")]
    NormalizeFailed {
        /// The raw URL that failed to normalize.
        url: String,
        /// Why normalization failed.
        reason: String,
    },

    /// The controller or crawl state has been stopped. Treated as
    /// normal termination by the engine, not a hard failure.
    #[error("stopped")]
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_load_failed_includes_status() {
        let err = AuditError::PageLoadFailed {
            status: Some(404),
            message: "not found".into(),
        };
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn stopped_has_fixed_message() {
        assert_eq!(AuditError::Stopped.to_string(), "stopped");
    }
}
