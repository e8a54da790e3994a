//! Per-page crawl results.

use crate::audit::AuditResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a [`PageResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Enqueued but not yet dequeued.
    Pending,
    /// Dequeued and currently being worked.
    Processing,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Never processed (dropped by the frontier's caps).
    Skipped,
}

/// The outcome of processing one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// URL as discovered.
    pub url: String,
    /// Normalized identity key.
    pub normalized_url: String,
    /// Crawl depth at which this page was reached.
    pub depth: u32,
    /// Normalized URL of the page that linked here, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
    /// Current status.
    pub status: PageStatus,
    /// When this item began processing.
    pub start_time: DateTime<Utc>,
    /// When this item finished processing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Wall-clock duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    /// Error message, present only when `status == failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Count of navigational links discovered on this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_found: Option<usize>,
    /// The per-page audit result, present only when `status == completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_result: Option<AuditResult>,
    /// Number of extra attempts the page preparer needed, beyond the
    /// first. Additive instrumentation, not part of the core state
    /// machine.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub retries: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl PageResult {
    /// Construct a pending result at the moment of enqueue.
    pub fn pending(url: impl Into<String>, normalized_url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            normalized_url: normalized_url.into(),
            depth,
            parent_url: None,
            status: PageStatus::Pending,
            start_time: Utc::now(),
            end_time: None,
            duration_ms: None,
            error: None,
            links_found: None,
            audit_result: None,
            retries: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_omitted_when_zero() {
        let result = PageResult::pending("https://example.com", "https://example.com", 0);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("retries").is_none());
    }
}
