//! Centering detector: an element whose markup or computed style signals
//! centering intent (`margin: 0 auto`, a `center`/`mx-auto` class, or a
//! flex/grid parent centering its items) but whose rendered midpoint is
//! measurably off from its parent's.
//!
//! Disabled by default: it is opt-in because centering intent is
//! inferred heuristically and is noisier than the other geometry
//! checks.

use crate::common::eval_json;
use crate::scripts::centering::CENTERING_CANDIDATES_SCRIPT;
use async_trait::async_trait;
use domsentry_driver::PageHandle;
use domsentry_types::{BoundingBox, ElementLocation, Issue, IssueKind, Result, Severity};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct CenteringCandidate {
    selector: String,
    bounds: BoundingBox,
    #[serde(rename = "parentBounds")]
    parent_bounds: BoundingBox,
}

#[derive(Debug, Clone)]
pub struct CenteringConfig {
    /// Off-center tolerance as a fraction of the parent's width.
    pub tolerance_ratio: f64,
}

impl Default for CenteringConfig {
    fn default() -> Self {
        Self { tolerance_ratio: 0.05 }
    }
}

pub struct CenteringDetector {
    config: CenteringConfig,
}

impl CenteringDetector {
    pub fn new(config: CenteringConfig) -> Self {
        Self { config }
    }
}

impl Default for CenteringDetector {
    fn default() -> Self {
        Self::new(CenteringConfig::default())
    }
}

#[async_trait]
impl crate::common::Detector for CenteringDetector {
    fn name(&self) -> &'static str {
        "centering"
    }

    async fn detect(&self, page: &dyn PageHandle) -> Result<Vec<Issue>> {
        let candidates: Vec<CenteringCandidate> =
            eval_json(page, self.name(), CENTERING_CANDIDATES_SCRIPT).await?;

        let mut issues = Vec::new();
        for candidate in candidates {
            if candidate.parent_bounds.width <= 0.0 {
                continue;
            }

            let child_center = candidate.bounds.x + candidate.bounds.width / 2.0;
            let parent_center = candidate.parent_bounds.x + candidate.parent_bounds.width / 2.0;
            let offset = (child_center - parent_center).abs();
            let ratio = offset / candidate.parent_bounds.width;

            if ratio <= self.config.tolerance_ratio {
                continue;
            }

            let severity = if ratio > 0.2 { Severity::Major } else { Severity::Minor };

            issues.push(Issue::new(
                IssueKind::Centering,
                severity,
                format!(
                    "'{}' is off-center by {:.1}px ({:.0}% of its parent's width)",
                    candidate.selector,
                    offset,
                    ratio * 100.0
                ),
                vec![ElementLocation::new(candidate.selector, candidate.bounds)],
            ));
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_element_within_tolerance_is_ignored() {
        let candidate = CenteringCandidate {
            selector: "div.hero".into(),
            bounds: BoundingBox::new(95.0, 0.0, 200.0, 50.0),
            parent_bounds: BoundingBox::new(0.0, 0.0, 400.0, 50.0),
        };
        let child_center = candidate.bounds.x + candidate.bounds.width / 2.0;
        let parent_center = candidate.parent_bounds.x + candidate.parent_bounds.width / 2.0;
        let ratio = (child_center - parent_center).abs() / candidate.parent_bounds.width;
        assert!(ratio <= CenteringConfig::default().tolerance_ratio);
    }

    #[test]
    fn badly_offset_element_is_major() {
        let candidate = CenteringCandidate {
            selector: "div.hero".into(),
            bounds: BoundingBox::new(0.0, 0.0, 200.0, 50.0),
            parent_bounds: BoundingBox::new(0.0, 0.0, 400.0, 50.0),
        };
        let child_center = candidate.bounds.x + candidate.bounds.width / 2.0;
        let parent_center = candidate.parent_bounds.x + candidate.parent_bounds.width / 2.0;
        let ratio = (child_center - parent_center).abs() / candidate.parent_bounds.width;
        assert!(ratio > 0.2);
    }
}
