//! Spacing detector: insufficient gaps between sibling interactive
//! elements.

use crate::common::{contains_any, eval_json};
use crate::scripts::spacing::SPACING_ELEMENTS_SCRIPT;
use async_trait::async_trait;
use domsentry_driver::PageHandle;
use domsentry_types::{BoundingBox, ElementLocation, Issue, IssueKind, Result, Severity};
use serde::Deserialize;
use std::collections::HashMap;

const CONTAINER_PREFIXES: &[&str] = &[
    "div.", "section.", "header.", "footer.", "main.", "article.", "aside.", "nav.",
];
const IGNORE_KEYWORDS: &[&str] = &[
    "separator", "divider", "spacer", "dropdown-toggle", "caret", "arrow", "badge", "indicator",
];

#[derive(Debug, Clone, Deserialize)]
struct SpacingElement {
    selector: String,
    bounds: BoundingBox,
    #[serde(rename = "parentSelector")]
    parent_selector: String,
    #[serde(rename = "isInline")]
    is_inline: bool,
    #[allow(dead_code)]
    text_content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SpacingConfig {
    pub minimum_horizontal_spacing_px: f64,
    pub minimum_vertical_spacing_px: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            minimum_horizontal_spacing_px: 8.0,
            minimum_vertical_spacing_px: 12.0,
        }
    }
}

pub struct SpacingDetector {
    config: SpacingConfig,
}

impl SpacingDetector {
    pub fn new(config: SpacingConfig) -> Self {
        Self { config }
    }

    fn should_skip(selector: &str) -> bool {
        if CONTAINER_PREFIXES.iter().any(|p| selector.starts_with(p)) {
            return true;
        }
        contains_any(selector, IGNORE_KEYWORDS)
    }

    fn severity_for_ratio(ratio: f64) -> Severity {
        if ratio < 0.25 {
            Severity::Critical
        } else if ratio < 0.5 {
            Severity::Major
        } else {
            Severity::Minor
        }
    }
}

impl Default for SpacingDetector {
    fn default() -> Self {
        Self::new(SpacingConfig::default())
    }
}

#[async_trait]
impl crate::common::Detector for SpacingDetector {
    fn name(&self) -> &'static str {
        "spacing"
    }

    async fn detect(&self, page: &dyn PageHandle) -> Result<Vec<Issue>> {
        let elements: Vec<SpacingElement> = eval_json(page, self.name(), SPACING_ELEMENTS_SCRIPT).await?;

        let mut groups: HashMap<String, Vec<SpacingElement>> = HashMap::new();
        for el in elements {
            if Self::should_skip(&el.selector) {
                continue;
            }
            groups.entry(el.parent_selector.clone()).or_default().push(el);
        }

        let mut issues = Vec::new();
        for (_parent, mut members) in groups {
            let (inline, block): (Vec<_>, Vec<_>) = members.drain(..).partition(|e| e.is_inline);
            issues.extend(self.check_sequence(inline, Axis::Horizontal));
            issues.extend(self.check_sequence(block, Axis::Vertical));
        }
        Ok(issues)
    }
}

enum Axis {
    Horizontal,
    Vertical,
}

impl SpacingDetector {
    fn check_sequence(&self, mut members: Vec<SpacingElement>, axis: Axis) -> Vec<Issue> {
        match axis {
            Axis::Horizontal => members.sort_by(|a, b| a.bounds.x.partial_cmp(&b.bounds.x).unwrap()),
            Axis::Vertical => members.sort_by(|a, b| a.bounds.y.partial_cmp(&b.bounds.y).unwrap()),
        }

        let recommended = match axis {
            Axis::Horizontal => self.config.minimum_horizontal_spacing_px,
            Axis::Vertical => self.config.minimum_vertical_spacing_px,
        };

        let mut issues = Vec::new();
        for pair in members.windows(2) {
            let (cur, next) = (&pair[0], &pair[1]);
            let gap = match axis {
                Axis::Horizontal => next.bounds.x - cur.bounds.right(),
                Axis::Vertical => next.bounds.y - cur.bounds.bottom(),
            };
            if gap >= recommended {
                continue;
            }

            let ratio = gap / recommended;
            let severity = Self::severity_for_ratio(ratio);

            issues.push(
                Issue::new(
                    IssueKind::Spacing,
                    severity,
                    format!(
                        "'{}' and '{}' are only {:.1}px apart, below the recommended {:.1}px",
                        cur.selector, next.selector, gap, recommended
                    ),
                    vec![
                        ElementLocation::new(cur.selector.clone(), cur.bounds),
                        ElementLocation::new(next.selector.clone(), next.bounds),
                    ],
                )
                .with_spacing(gap, recommended),
            );
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(selector: &str, parent: &str, x: f64, y: f64, w: f64, h: f64, inline: bool) -> SpacingElement {
        SpacingElement {
            selector: selector.to_string(),
            bounds: BoundingBox::new(x, y, w, h),
            parent_selector: parent.to_string(),
            is_inline: inline,
            text_content: None,
        }
    }

    #[test]
    fn tight_horizontal_gap_is_critical() {
        let d = SpacingDetector::default();
        let members = vec![
            element("a.link1", "nav", 0.0, 0.0, 50.0, 20.0, true),
            element("a.link2", "nav", 51.0, 0.0, 50.0, 20.0, true),
        ];
        let issues = d.check_sequence(members, Axis::Horizontal);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn adequate_spacing_produces_no_issue() {
        let d = SpacingDetector::default();
        let members = vec![
            element("a.link1", "nav", 0.0, 0.0, 50.0, 20.0, true),
            element("a.link2", "nav", 70.0, 0.0, 50.0, 20.0, true),
        ];
        let issues = d.check_sequence(members, Axis::Horizontal);
        assert!(issues.is_empty());
    }

    #[test]
    fn container_selectors_are_skipped() {
        assert!(SpacingDetector::should_skip("div.container"));
        assert!(SpacingDetector::should_skip(".dropdown-toggle"));
        assert!(!SpacingDetector::should_skip("a.btn-primary"));
    }
}
