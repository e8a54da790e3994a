//! Shared detector plumbing: the element shapes driver scripts return,
//! and the `Detector` trait every check implements.
//!
//! Grounded on `riptide-spider/src/extractor.rs`'s pattern of decoding a
//! driver-evaluated script's JSON result into a typed Rust struct and
//! never touching the DOM directly from Rust.

use async_trait::async_trait;
use domsentry_driver::PageHandle;
use domsentry_types::{BoundingBox, Issue};
use serde::Deserialize;
use std::sync::Arc;

/// A presentational element extracted by a driver-side script, as used
/// by the overlap detector.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementRecord {
    pub selector: String,
    pub bounds: BoundingBox,
    #[serde(default)]
    pub is_fixed: bool,
    pub text_content: Option<String>,
}

/// A pure, page-evaluating check. Detectors never mutate the page and
/// may run in any order; the analyzer concatenates their output.
#[async_trait]
pub trait Detector: Send + Sync {
    /// The detector's name, used for error attribution only.
    fn name(&self) -> &'static str;

    async fn detect(&self, page: &dyn PageHandle) -> domsentry_types::Result<Vec<Issue>>;
}

/// Lets an `Arc<T>`-held detector (e.g. one also shared for its
/// listener-installing methods) be boxed into an analyzer's detector
/// list alongside plain owned detectors.
#[async_trait]
impl<T: Detector + ?Sized> Detector for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn detect(&self, page: &dyn PageHandle) -> domsentry_types::Result<Vec<Issue>> {
        (**self).detect(page).await
    }
}

/// Evaluate `script` and decode its JSON result as `T`, wrapping
/// failures as a [`domsentry_types::AuditError::DetectorFailed`]
/// attributed to `detector`.
pub(crate) async fn eval_json<T: for<'de> Deserialize<'de>>(
    page: &dyn PageHandle,
    detector: &str,
    script: &str,
) -> domsentry_types::Result<T> {
    let raw = page
        .evaluate(script)
        .await
        .map_err(|e| domsentry_types::AuditError::DetectorFailed {
            detector: detector.to_string(),
            message: e.to_string(),
        })?;
    serde_json::from_value(raw).map_err(|e| domsentry_types::AuditError::DetectorFailed {
        detector: detector.to_string(),
        message: e.to_string(),
    })
}

/// Case-insensitive substring match against any of `keywords`.
pub(crate) fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    let lower = haystack.to_ascii_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// True when `selector` reads as a navigation/branding element; these
/// are exempt from several false-positive filters and forced to
/// `critical` severity.
pub(crate) fn is_nav_like(selector: &str) -> bool {
    contains_any(
        selector,
        &["nav", "header", "menu", "navigation", "navbar", "logo", "brand"],
    )
}
