//! Scrollbar detector: unexpected horizontal/vertical overflow of the
//! document past the viewport.
//!
//! Script errors and timeouts are swallowed into an empty issue list —
//! this detector is never allowed to fail the page.

use crate::scripts::scrollbar::SCROLLBAR_SCRIPT;
use async_trait::async_trait;
use domsentry_driver::PageHandle;
use domsentry_types::{BoundingBox, ElementLocation, Issue, IssueKind, Result, Severity};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrollbarMeasurement {
    viewport_width: f64,
    #[allow(dead_code)]
    viewport_height: f64,
    doc_width: f64,
    doc_height: f64,
    causing_selector: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScrollbarConfig {
    pub expect_vertical_scrollbar: bool,
}

impl Default for ScrollbarConfig {
    fn default() -> Self {
        Self {
            expect_vertical_scrollbar: true,
        }
    }
}

pub struct ScrollbarDetector {
    config: ScrollbarConfig,
}

impl ScrollbarDetector {
    pub fn new(config: ScrollbarConfig) -> Self {
        Self { config }
    }
}

impl Default for ScrollbarDetector {
    fn default() -> Self {
        Self::new(ScrollbarConfig::default())
    }
}

#[async_trait]
impl crate::common::Detector for ScrollbarDetector {
    fn name(&self) -> &'static str {
        "scrollbar"
    }

    async fn detect(&self, page: &dyn PageHandle) -> Result<Vec<Issue>> {
        let measurement: ScrollbarMeasurement = match page.evaluate(SCROLLBAR_SCRIPT).await {
            Ok(raw) => match serde_json::from_value(raw) {
                Ok(m) => m,
                Err(e) => {
                    warn!(error = %e, "scrollbar detector: failed to decode measurement");
                    return Ok(Vec::new());
                }
            },
            Err(e) => {
                warn!(error = %e, "scrollbar detector: script evaluation failed");
                return Ok(Vec::new());
            }
        };

        Ok(self.build_issues(&measurement))
    }
}

impl ScrollbarDetector {
    fn build_issues(&self, m: &ScrollbarMeasurement) -> Vec<Issue> {
        let mut issues = Vec::new();

        let horizontal_overflow = m.doc_width - m.viewport_width;
        if horizontal_overflow > 5.0 {
            let severity = if horizontal_overflow > 100.0 {
                Severity::Critical
            } else if horizontal_overflow > 20.0 {
                Severity::Major
            } else {
                Severity::Minor
            };
            let selector = m.causing_selector.clone().unwrap_or_else(|| "body".to_string());
            issues.push(
                Issue::new(
                    IssueKind::Scrollbar,
                    severity,
                    format!(
                        "unexpected horizontal scrollbar: document is {horizontal_overflow:.0}px wider than the viewport"
                    ),
                    vec![ElementLocation::new(
                        selector,
                        BoundingBox::new(0.0, 0.0, m.doc_width, m.viewport_height),
                    )],
                )
                .with_overflow_px(horizontal_overflow),
            );
        }

        let vertical_overflow = m.doc_height - m.viewport_height;
        if !self.config.expect_vertical_scrollbar && vertical_overflow > 50.0 {
            issues.push(
                Issue::new(
                    IssueKind::Scrollbar,
                    Severity::Minor,
                    format!(
                        "unexpected vertical scrollbar: document is {vertical_overflow:.0}px taller than the viewport"
                    ),
                    vec![],
                )
                .with_overflow_px(vertical_overflow),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(viewport_width: f64, doc_width: f64) -> ScrollbarMeasurement {
        ScrollbarMeasurement {
            viewport_width,
            viewport_height: 800.0,
            doc_width,
            doc_height: 800.0,
            causing_selector: Some("div.wide".to_string()),
        }
    }

    #[test]
    fn small_overflow_below_threshold_is_ignored() {
        let d = ScrollbarDetector::default();
        let issues = d.build_issues(&measurement(1000.0, 1004.0));
        assert!(issues.is_empty());
    }

    #[test]
    fn large_overflow_is_critical() {
        let d = ScrollbarDetector::default();
        let issues = d.build_issues(&measurement(1000.0, 1150.0));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn moderate_overflow_is_major() {
        let d = ScrollbarDetector::default();
        let issues = d.build_issues(&measurement(1000.0, 1030.0));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Major);
    }

    #[test]
    fn decodes_the_driver_scripts_camel_case_shape() {
        let raw = serde_json::json!({
            "viewportWidth": 1000.0,
            "viewportHeight": 800.0,
            "docWidth": 1150.0,
            "docHeight": 800.0,
            "causingSelector": "div.wide",
        });
        let m: ScrollbarMeasurement = serde_json::from_value(raw).unwrap();
        assert_eq!(m.viewport_width, 1000.0);
        assert_eq!(m.doc_width, 1150.0);
        assert_eq!(m.causing_selector.as_deref(), Some("div.wide"));
    }
}
