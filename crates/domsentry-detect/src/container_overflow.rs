//! Container-overflow detector: a child whose box extends past its
//! container's bounds on any side.

use crate::common::{contains_any, eval_json};
use crate::scripts::container_overflow::CONTAINER_PAIRS_SCRIPT;
use async_trait::async_trait;
use domsentry_driver::PageHandle;
use domsentry_types::{BoundingBox, ElementLocation, Issue, IssueKind, OverflowAmount, Result, Severity};
use serde::Deserialize;

const IGNORED_KEYWORDS: &[&str] = &[
    "dropdown", "tooltip", "popup", "modal", "menu", "overflow", "code", "pre", "dialog",
];

#[derive(Debug, Clone, Deserialize)]
struct ContainerPair {
    #[serde(rename = "parentSelector")]
    parent_selector: String,
    #[serde(rename = "childSelector")]
    child_selector: String,
    parent: BoundingBox,
    child: BoundingBox,
}

#[derive(Debug, Clone)]
pub struct ContainerOverflowConfig {
    pub min_overflow_px: f64,
}

impl Default for ContainerOverflowConfig {
    fn default() -> Self {
        Self { min_overflow_px: 5.0 }
    }
}

pub struct ContainerOverflowDetector {
    config: ContainerOverflowConfig,
}

impl ContainerOverflowDetector {
    pub fn new(config: ContainerOverflowConfig) -> Self {
        Self { config }
    }
}

impl Default for ContainerOverflowDetector {
    fn default() -> Self {
        Self::new(ContainerOverflowConfig::default())
    }
}

#[async_trait]
impl crate::common::Detector for ContainerOverflowDetector {
    fn name(&self) -> &'static str {
        "container-overflow"
    }

    async fn detect(&self, page: &dyn PageHandle) -> Result<Vec<Issue>> {
        let pairs: Vec<ContainerPair> = eval_json(page, self.name(), CONTAINER_PAIRS_SCRIPT).await?;

        let mut issues = Vec::new();
        for pair in pairs {
            if contains_any(&pair.parent_selector, IGNORED_KEYWORDS)
                || contains_any(&pair.child_selector, IGNORED_KEYWORDS)
            {
                continue;
            }

            let overflow = OverflowAmount {
                top: (pair.parent.y - pair.child.y).max(0.0),
                left: (pair.parent.x - pair.child.x).max(0.0),
                right: (pair.child.right() - pair.parent.right()).max(0.0),
                bottom: (pair.child.bottom() - pair.parent.bottom()).max(0.0),
            };
            if overflow.is_zero() {
                continue;
            }
            if overflow.max_side() < self.config.min_overflow_px {
                continue;
            }

            let ratio_top = overflow.top / pair.parent.height;
            let ratio_bottom = overflow.bottom / pair.parent.height;
            let ratio_left = overflow.left / pair.parent.width;
            let ratio_right = overflow.right / pair.parent.width;
            let worst_ratio = [ratio_top, ratio_bottom, ratio_left, ratio_right]
                .into_iter()
                .fold(0.0_f64, f64::max)
                * 100.0;

            let severity = if worst_ratio >= 30.0 {
                Severity::Critical
            } else if worst_ratio >= 15.0 {
                Severity::Major
            } else {
                Severity::Minor
            };

            issues.push(
                Issue::new(
                    IssueKind::ContainerOverflow,
                    severity,
                    format!(
                        "'{}' overflows its container '{}' by up to {:.1}px",
                        pair.child_selector,
                        pair.parent_selector,
                        overflow.max_side()
                    ),
                    vec![
                        ElementLocation::new(pair.parent_selector, pair.parent),
                        ElementLocation::new(pair.child_selector, pair.child),
                    ],
                )
                .with_overflow_amount(overflow),
            );
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_overflow_produces_no_issue() {
        let parent = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let child = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let overflow = OverflowAmount {
            top: (parent.y - child.y).max(0.0),
            left: (parent.x - child.x).max(0.0),
            right: (child.right() - parent.right()).max(0.0),
            bottom: (child.bottom() - parent.bottom()).max(0.0),
        };
        assert!(overflow.is_zero());
    }

    #[test]
    fn ignored_selectors_are_filtered() {
        assert!(contains_any(".dropdown-menu", IGNORED_KEYWORDS));
        assert!(contains_any("[role='tooltip']", IGNORED_KEYWORDS));
        assert!(!contains_any("div.card", IGNORED_KEYWORDS));
    }
}
