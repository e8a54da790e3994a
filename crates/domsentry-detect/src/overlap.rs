//! Overlap detector: flags presentational elements whose rendered
//! boxes visually overlap.

use crate::common::{contains_any, eval_json, is_nav_like, ElementRecord};
use crate::scripts::overlap::{ELEMENTS_SCRIPT, HEADER_SWEEP_SCRIPT, SCROLL_OFFSET_SCRIPT};
use async_trait::async_trait;
use domsentry_driver::PageHandle;
use domsentry_types::{BoundingBox, ElementLocation, Issue, IssueKind, Result, Severity};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct ScrollOffset {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct SweepElement {
    selector: String,
    bounds: BoundingBox,
}

#[derive(Debug, Clone, Deserialize)]
struct SweepPair {
    a: SweepElement,
    b: SweepElement,
    percentage: f64,
}

/// Tunables for the overlap detector.
#[derive(Debug, Clone)]
pub struct OverlapConfig {
    /// Minimum overlap percentage to report for a non-nav pair.
    pub min_overlap_percentage: f64,
    /// Disables the header sweep short-circuit (used by the detector's
    /// own tests, which want deterministic main-sweep-only behavior).
    pub test_mode: bool,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            min_overlap_percentage: 5.0,
            test_mode: false,
        }
    }
}

pub struct OverlapDetector {
    config: OverlapConfig,
}

impl OverlapDetector {
    pub fn new(config: OverlapConfig) -> Self {
        Self { config }
    }
}

impl Default for OverlapDetector {
    fn default() -> Self {
        Self::new(OverlapConfig::default())
    }
}

#[async_trait]
impl crate::common::Detector for OverlapDetector {
    fn name(&self) -> &'static str {
        "overlap"
    }

    async fn detect(&self, page: &dyn PageHandle) -> Result<Vec<Issue>> {
        if !self.config.test_mode {
            let sweep_issues = self.run_header_sweep(page).await?;
            if !sweep_issues.is_empty() {
                return Ok(sweep_issues);
            }
        }
        self.run_main_sweep(page).await
    }
}

impl OverlapDetector {
    async fn run_header_sweep(&self, page: &dyn PageHandle) -> Result<Vec<Issue>> {
        let pairs: Vec<SweepPair> = eval_json(page, self.name(), HEADER_SWEEP_SCRIPT).await?;
        Ok(pairs
            .into_iter()
            .map(|pair| {
                Issue::new(
                    IssueKind::Overlap,
                    Severity::Critical,
                    format!(
                        "header-area elements '{}' and '{}' overlap by {:.1}%",
                        pair.a.selector, pair.b.selector, pair.percentage
                    ),
                    vec![
                        ElementLocation::new(pair.a.selector, pair.a.bounds),
                        ElementLocation::new(pair.b.selector, pair.b.bounds),
                    ],
                )
            })
            .collect())
    }

    async fn run_main_sweep(&self, page: &dyn PageHandle) -> Result<Vec<Issue>> {
        let elements: Vec<ElementRecord> = eval_json(page, self.name(), ELEMENTS_SCRIPT).await?;
        let scroll: ScrollOffset = eval_json(page, self.name(), SCROLL_OFFSET_SCRIPT).await?;

        let mut issues = Vec::new();
        for i in 0..elements.len() {
            for j in (i + 1)..elements.len() {
                if let Some(issue) = self.check_pair(&elements[i], &elements[j], &scroll) {
                    issues.push(issue);
                }
            }
        }
        Ok(issues)
    }

    fn check_pair(&self, a: &ElementRecord, b: &ElementRecord, scroll: &ScrollOffset) -> Option<Issue> {
        let (a_bounds, b_bounds) = reconcile_fixed(a, b, scroll);

        if one_above_viewport(a_bounds.y, b_bounds.y) {
            return None;
        }

        let overlap = a_bounds.intersect(&b_bounds)?;
        let area_a = a_bounds.area();
        let area_b = b_bounds.area();
        let smaller = area_a.min(area_b);
        if smaller <= 0.0 {
            return None;
        }
        let percentage = 100.0 * overlap.area() / smaller;

        let nav_involved = is_nav_like(&a.selector) || is_nav_like(&b.selector);
        let threshold = if nav_involved { 1.0 } else { self.config.min_overlap_percentage };
        if percentage < threshold {
            return None;
        }

        if !nav_involved && self.is_false_positive(a, b, &overlap, percentage, a.is_fixed, b.is_fixed) {
            return None;
        }

        let severity = if nav_involved {
            Severity::Critical
        } else if percentage >= 50.0 {
            Severity::Critical
        } else if percentage >= 25.0 {
            Severity::Major
        } else {
            Severity::Minor
        };

        Some(
            Issue::new(
                IssueKind::Overlap,
                severity,
                format!(
                    "'{}' and '{}' overlap by {:.1}%",
                    a.selector, b.selector, percentage
                ),
                vec![
                    ElementLocation::new(a.selector.clone(), a.bounds),
                    ElementLocation::new(b.selector.clone(), b.bounds),
                ],
            )
            .with_overlap_area(domsentry_types::OverlapArea {
                width: overlap.width,
                height: overlap.height,
                percentage,
            }),
        )
    }

    fn is_false_positive(
        &self,
        a: &ElementRecord,
        b: &ElementRecord,
        overlap: &BoundingBox,
        percentage: f64,
        a_fixed: bool,
        b_fixed: bool,
    ) -> bool {
        if is_container_only(&a.selector) && is_container_only(&b.selector) {
            return true;
        }
        if is_media_in_interactive(&a.selector, &b.selector) {
            return true;
        }
        if is_stacked_text(a, b) {
            return true;
        }
        if is_adjacent_grid_item(&a.selector, &b.selector) && percentage < 15.0 {
            return true;
        }
        if overlap.area() < 50.0 && !is_interactive(&a.selector) && !is_interactive(&b.selector) {
            return true;
        }
        if a_fixed != b_fixed && percentage < 25.0 {
            return true;
        }
        false
    }
}

fn reconcile_fixed(a: &ElementRecord, b: &ElementRecord, scroll: &ScrollOffset) -> (BoundingBox, BoundingBox) {
    match (a.is_fixed, b.is_fixed) {
        (true, false) => (a.bounds, b.bounds.translated(-scroll.x, -scroll.y)),
        (false, true) => (a.bounds.translated(-scroll.x, -scroll.y), b.bounds),
        _ => (a.bounds, b.bounds),
    }
}

fn one_above_viewport(a_y: f64, b_y: f64) -> bool {
    (a_y < -10.0 && b_y >= 0.0) || (b_y < -10.0 && a_y >= 0.0)
}

fn is_container_only(selector: &str) -> bool {
    (selector.starts_with("div") || selector.starts_with("section")) && !is_nav_like(selector)
}

fn is_media_in_interactive(a: &str, b: &str) -> bool {
    let has_interactive = |s: &str| contains_any(s, &["a.", "a", "button"]);
    let has_media = |s: &str| contains_any(s, &["img", "svg"]);
    (has_interactive(a) && has_media(b)) || (has_interactive(b) && has_media(a))
}

fn is_stacked_text(a: &ElementRecord, b: &ElementRecord) -> bool {
    let is_text = |s: &str| s.starts_with('p') || s.starts_with('h');
    if !is_text(&a.selector) || !is_text(&b.selector) {
        return false;
    }
    let width_close = (a.bounds.width - b.bounds.width).abs() < 5.0;
    let x_close = (a.bounds.x - b.bounds.x).abs() < 5.0;
    width_close && x_close
}

fn is_adjacent_grid_item(a: &str, b: &str) -> bool {
    contains_any(a, &["li", "card", "grid-item"]) && contains_any(b, &["li", "card", "grid-item"])
}

fn is_interactive(selector: &str) -> bool {
    contains_any(selector, &["a", "button", "input"])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(selector: &str, x: f64, y: f64, w: f64, h: f64, fixed: bool) -> ElementRecord {
        ElementRecord {
            selector: selector.to_string(),
            bounds: BoundingBox::new(x, y, w, h),
            is_fixed: fixed,
            text_content: None,
        }
    }

    fn detector() -> OverlapDetector {
        OverlapDetector::new(OverlapConfig {
            min_overlap_percentage: 5.0,
            test_mode: true,
        })
    }

    #[test]
    fn nav_overlap_is_always_critical_at_low_threshold() {
        let d = detector();
        let a = element("nav.navbar", 0.0, 0.0, 100.0, 50.0, false);
        let b = element("div.hero", 10.0, 10.0, 100.0, 50.0, false);
        let scroll = ScrollOffset { x: 0.0, y: 0.0 };
        let issue = d.check_pair(&a, &b, &scroll).expect("should overlap");
        assert_eq!(issue.severity, Severity::Critical);
    }

    #[test]
    fn disjoint_elements_produce_no_issue() {
        let d = detector();
        let a = element("div.card", 0.0, 0.0, 10.0, 10.0, false);
        let b = element("div.card", 100.0, 100.0, 10.0, 10.0, false);
        let scroll = ScrollOffset { x: 0.0, y: 0.0 };
        assert!(d.check_pair(&a, &b, &scroll).is_none());
    }

    #[test]
    fn stacked_text_is_filtered() {
        let d = detector();
        let a = element("p", 0.0, 0.0, 100.0, 30.0, false);
        let b = element("p", 0.0, 5.0, 100.0, 30.0, false);
        let scroll = ScrollOffset { x: 0.0, y: 0.0 };
        assert!(d.check_pair(&a, &b, &scroll).is_none());
    }

    #[test]
    fn severity_thresholds_scale_with_percentage() {
        let d = detector();
        let scroll = ScrollOffset { x: 0.0, y: 0.0 };

        let a = element("button.buy", 0.0, 0.0, 100.0, 100.0, false);
        let b_minor = element("span.label", 0.0, 95.0, 100.0, 100.0, false);
        let minor = d.check_pair(&a, &b_minor, &scroll).unwrap();
        assert_eq!(minor.severity, Severity::Minor);

        let b_major = element("span.label", 0.0, 90.0, 100.0, 40.0, false);
        let major = d.check_pair(&a, &b_major, &scroll).unwrap();
        assert_eq!(major.severity, Severity::Major);
    }
}
