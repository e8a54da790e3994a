//! Padding detector: a specialization of the container-overflow pairing
//! that looks the other direction — a child sitting flush (or nearly
//! flush) against its container's edges rather than overflowing it.
//!
//! Shares its driver data with [`crate::container_overflow`]; the two
//! detectors differ only in which geometric condition they grade.

use crate::common::{contains_any, eval_json};
use crate::scripts::container_overflow::CONTAINER_PAIRS_SCRIPT;
use async_trait::async_trait;
use domsentry_driver::PageHandle;
use domsentry_types::{BoundingBox, ElementLocation, Issue, IssueKind, Result, Severity};
use serde::Deserialize;

const IGNORED_KEYWORDS: &[&str] = &["dropdown", "tooltip", "popup", "modal", "menu", "code", "pre"];

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
pub struct PaddingConfig {
    pub min_padding_px: f64,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self { min_padding_px: 8.0 }
    }
}

pub struct PaddingDetector {
    config: PaddingConfig,
}

impl PaddingDetector {
    pub fn new(config: PaddingConfig) -> Self {
        Self { config }
    }
}

impl Default for PaddingDetector {
    fn default() -> Self {
        Self::new(PaddingConfig::default())
    }
}

#[async_trait]
impl crate::common::Detector for PaddingDetector {
    fn name(&self) -> &'static str {
        "padding"
    }

    async fn detect(&self, page: &dyn PageHandle) -> Result<Vec<Issue>> {
        let pairs: Vec<ContainerPair> = eval_json(page, self.name(), CONTAINER_PAIRS_SCRIPT).await?;

        let mut issues = Vec::new();
        for pair in pairs {
            if contains_any(&pair.parent_selector, IGNORED_KEYWORDS) || contains_any(&pair.child_selector, IGNORED_KEYWORDS) {
                continue;
            }

            let top = pair.child.y - pair.parent.y;
            let left = pair.child.x - pair.parent.x;
            let right = pair.parent.right() - pair.child.right();
            let bottom = pair.parent.bottom() - pair.child.bottom();

            // Only a child fully inside its parent has a meaningful inset;
            // a negative value here means it overflows, which is the other
            // detector's concern.
            if top < 0.0 || left < 0.0 || right < 0.0 || bottom < 0.0 {
                continue;
            }

            let worst = top.min(left).min(right).min(bottom);
            if worst >= self.config.min_padding_px {
                continue;
            }

            let severity = if worst <= 0.0 {
                Severity::Major
            } else {
                Severity::Minor
            };

            issues.push(Issue::new(
                IssueKind::Padding,
                severity,
                format!(
                    "'{}' sits only {:.1}px from the edge of '{}', below the recommended {:.1}px",
                    pair.child_selector, worst, pair.parent_selector, self.config.min_padding_px
                ),
                vec![
                    ElementLocation::new(pair.parent_selector, pair.parent),
                    ElementLocation::new(pair.child_selector, pair.child),
                ],
            ));
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_child_is_reported() {
        let parent = BoundingBox::new(0.0, 0.0, 200.0, 200.0);
        let child = BoundingBox::new(0.0, 0.0, 200.0, 50.0);
        let top = child.y - parent.y;
        let left = child.x - parent.x;
        assert_eq!(top, 0.0);
        assert_eq!(left, 0.0);
    }

    #[test]
    fn ignored_selectors_filtered() {
        assert!(contains_any(".modal-body", IGNORED_KEYWORDS));
        assert!(!contains_any("div.card-body", IGNORED_KEYWORDS));
    }
}
