//! Analyzer: runs an ordered set of detectors against one prepared page
//! and assembles the result.

use crate::common::Detector;
use domsentry_driver::PageHandle;
use domsentry_types::{AuditResult, Issue, Viewport};
use tracing::warn;

/// Runs detectors in order against a single page, concatenating their
/// issues. A detector that fails is logged and skipped — it never fails
/// the page as a whole.
pub struct Analyzer {
    detectors: Vec<Box<dyn Detector>>,
    viewport: Viewport,
}

impl Analyzer {
    pub fn new(detectors: Vec<Box<dyn Detector>>, viewport: Viewport) -> Self {
        Self { detectors, viewport }
    }

    pub async fn analyze(&self, page: &dyn PageHandle, url: &str) -> AuditResult {
        let mut issues: Vec<Issue> = Vec::new();

        for detector in &self.detectors {
            match detector.detect(page).await {
                Ok(found) => issues.extend(found),
                Err(err) => {
                    warn!(detector = detector.name(), url, error = %err, "detector failed, skipping");
                }
            }
        }

        AuditResult::new(url, self.viewport, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domsentry_types::{AuditError, IssueKind, Result, Severity};

    struct AlwaysFails;

    #[async_trait]
    impl Detector for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        async fn detect(&self, _page: &dyn PageHandle) -> Result<Vec<Issue>> {
            Err(AuditError::DetectorFailed {
                detector: "always-fails".into(),
                message: "boom".into(),
            })
        }
    }

    struct AlwaysFindsOne;

    #[async_trait]
    impl Detector for AlwaysFindsOne {
        fn name(&self) -> &'static str {
            "always-finds-one"
        }

        async fn detect(&self, _page: &dyn PageHandle) -> Result<Vec<Issue>> {
            Ok(vec![Issue::new(IssueKind::Overlap, Severity::Minor, "found", vec![])])
        }
    }

    struct StubPage;

    #[async_trait]
    impl PageHandle for StubPage {
        async fn goto(&self, _url: &str, _timeout: std::time::Duration) -> domsentry_driver::Result<domsentry_driver::NavigateOutcome> {
            unreachable!()
        }
        async fn set_viewport(&self, _width: u32, _height: u32) -> domsentry_driver::Result<()> {
            unreachable!()
        }
        async fn evaluate(&self, _script: &str) -> domsentry_driver::Result<serde_json::Value> {
            unreachable!()
        }
        async fn wait_for_idle(&self, _timeout: std::time::Duration) -> domsentry_driver::Result<()> {
            unreachable!()
        }
        fn on_console(&self, _handler: domsentry_driver::ConsoleHandler) {}
        fn on_page_error(&self, _handler: domsentry_driver::PageErrorHandler) {}
        async fn close(&self) -> domsentry_driver::Result<()> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn failing_detector_does_not_stop_the_run() {
        let analyzer = Analyzer::new(vec![Box::new(AlwaysFails), Box::new(AlwaysFindsOne)], Viewport::DESKTOP);
        let page = StubPage;
        let result = analyzer.analyze(&page, "https://example.com").await;
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.metadata.total_issues_found, 1);
    }
}
