//! Flex/grid layout detector: flex containers whose children overflow,
//! squeeze, or crowd, and grid containers with inconsistent sizing or
//! missing layout declarations.

use crate::common::eval_json;
use crate::scripts::flex_grid::FLEX_GRID_CONTAINERS_SCRIPT;
use async_trait::async_trait;
use domsentry_driver::PageHandle;
use domsentry_types::{BoundingBox, ElementLocation, Issue, IssueKind, Result, Severity};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct FlexGridChild {
    selector: String,
    bounds: BoundingBox,
    #[serde(rename = "flexShrink")]
    flex_shrink: f64,
    #[serde(rename = "flexGrow")]
    flex_grow: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct FlexGridContainer {
    selector: String,
    bounds: BoundingBox,
    #[serde(rename = "isFlex")]
    is_flex: bool,
    #[serde(rename = "isGrid")]
    is_grid: bool,
    #[serde(rename = "flexDirection")]
    flex_direction: Option<String>,
    #[serde(rename = "flexWrap")]
    flex_wrap: Option<String>,
    #[serde(rename = "gridTemplateColumns")]
    grid_template_columns: Option<String>,
    #[serde(rename = "gridTemplateRows")]
    grid_template_rows: Option<String>,
    gap: Option<String>,
    #[serde(rename = "rowGap")]
    row_gap: Option<String>,
    #[serde(rename = "columnGap")]
    column_gap: Option<String>,
    #[serde(rename = "overflowHidden")]
    overflow_hidden: bool,
    children: Vec<FlexGridChild>,
}

#[derive(Debug, Clone)]
pub struct FlexGridConfig {
    pub min_child_width: f64,
    pub min_gap: f64,
}

impl Default for FlexGridConfig {
    fn default() -> Self {
        Self {
            min_child_width: 10.0,
            min_gap: 4.0,
        }
    }
}

pub struct FlexGridDetector {
    config: FlexGridConfig,
}

impl FlexGridDetector {
    pub fn new(config: FlexGridConfig) -> Self {
        Self { config }
    }
}

impl Default for FlexGridDetector {
    fn default() -> Self {
        Self::new(FlexGridConfig::default())
    }
}

#[async_trait]
impl crate::common::Detector for FlexGridDetector {
    fn name(&self) -> &'static str {
        "flex-grid"
    }

    async fn detect(&self, page: &dyn PageHandle) -> Result<Vec<Issue>> {
        let containers: Vec<FlexGridContainer> =
            eval_json(page, self.name(), FLEX_GRID_CONTAINERS_SCRIPT).await?;

        let mut issues = Vec::new();
        for container in &containers {
            if container.is_flex {
                issues.extend(self.check_flex(container));
            }
            if container.is_grid {
                issues.extend(self.check_grid(container));
            }
        }
        Ok(issues)
    }
}

fn severity_for(message: &str) -> Severity {
    let lower = message.to_ascii_lowercase();
    if lower.contains("overflow") || lower.contains("squeez") || lower.contains("incorrect gap") || lower.contains("misaligned") {
        Severity::Major
    } else {
        Severity::Minor
    }
}

fn issue(kind_message: String, container: &FlexGridContainer, extra: Vec<ElementLocation>) -> Issue {
    let mut elements = vec![ElementLocation::new(container.selector.clone(), container.bounds)];
    elements.extend(extra);
    Issue::new(IssueKind::Layout, severity_for(&kind_message), kind_message, elements)
}

impl FlexGridDetector {
    fn has_gap(container: &FlexGridContainer) -> bool {
        container.gap.is_some() || container.row_gap.is_some() || container.column_gap.is_some()
    }

    fn check_flex(&self, container: &FlexGridContainer) -> Vec<Issue> {
        let mut issues = Vec::new();

        if container.flex_direction.is_none() {
            issues.push(issue(
                format!("'{}' is a flex container with no flex-direction declared", container.selector),
                container,
                vec![],
            ));
        }

        let is_row = container
            .flex_direction
            .as_deref()
            .map(|d| !d.starts_with("column"))
            .unwrap_or(true);

        if container.flex_wrap.as_deref() == Some("nowrap") && container.children.len() > 3 {
            let axis_sum: f64 = container
                .children
                .iter()
                .map(|c| if is_row { c.bounds.width } else { c.bounds.height })
                .sum();
            let container_extent = if is_row { container.bounds.width } else { container.bounds.height };
            if axis_sum > 1.1 * container_extent {
                issues.push(issue(
                    format!(
                        "children overflow container '{}' without flex-wrap",
                        container.selector
                    ),
                    container,
                    vec![],
                ));
            }
        }

        for child in &container.children {
            if child.flex_shrink > 0.0
                && child.flex_grow == 0.0
                && (child.bounds.width < self.config.min_child_width || child.bounds.height < self.config.min_child_width)
            {
                issues.push(issue(
                    format!("'{}' is excessively squeezed inside '{}'", child.selector, container.selector),
                    container,
                    vec![ElementLocation::new(child.selector.clone(), child.bounds)],
                ));
            }
        }

        if !Self::has_gap(container) {
            let mut sorted: Vec<&FlexGridChild> = container.children.iter().collect();
            if is_row {
                sorted.sort_by(|a, b| a.bounds.x.partial_cmp(&b.bounds.x).unwrap());
            } else {
                sorted.sort_by(|a, b| a.bounds.y.partial_cmp(&b.bounds.y).unwrap());
            }
            for pair in sorted.windows(2) {
                let gap = if is_row {
                    pair[1].bounds.x - pair[0].bounds.right()
                } else {
                    pair[1].bounds.y - pair[0].bounds.bottom()
                };
                if gap < self.config.min_gap {
                    issues.push(issue(
                        format!(
                            "insufficient spacing between '{}' and '{}' in '{}'",
                            pair[0].selector, pair[1].selector, container.selector
                        ),
                        container,
                        vec![
                            ElementLocation::new(pair[0].selector.clone(), pair[0].bounds),
                            ElementLocation::new(pair[1].selector.clone(), pair[1].bounds),
                        ],
                    ));
                    break;
                }
            }
        }

        issues
    }

    fn check_grid(&self, container: &FlexGridContainer) -> Vec<Issue> {
        let mut issues = Vec::new();

        if container.grid_template_columns.is_none() && container.grid_template_rows.is_none() {
            issues.push(issue(
                format!("'{}' is a grid container with no template columns or rows", container.selector),
                container,
                vec![],
            ));
        }

        if container.children.len() >= 3 {
            let widths: Vec<f64> = container.children.iter().map(|c| c.bounds.width).collect();
            let heights: Vec<f64> = container.children.iter().map(|c| c.bounds.height).collect();
            if coefficient_of_variation(&widths) > 0.3 || coefficient_of_variation(&heights) > 0.3 {
                issues.push(issue(
                    format!("'{}' has inconsistent sizing among its grid children", container.selector),
                    container,
                    vec![],
                ));
            }
        }

        if container.overflow_hidden {
            for child in &container.children {
                if child.bounds.width > container.bounds.width || child.bounds.height > container.bounds.height {
                    issues.push(issue(
                        format!(
                            "children overflow grid container '{}' (clipped by overflow: hidden)",
                            container.selector
                        ),
                        container,
                        vec![ElementLocation::new(child.selector.clone(), child.bounds)],
                    ));
                }
            }
        }

        if !Self::has_gap(container) {
            issues.push(issue(
                format!("'{}' is a grid container with no gap property", container.selector),
                container,
                vec![],
            ));
        }

        issues
    }
}

fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / mean
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(selector: &str, x: f64, y: f64, w: f64, h: f64, shrink: f64, grow: f64) -> FlexGridChild {
        FlexGridChild {
            selector: selector.to_string(),
            bounds: BoundingBox::new(x, y, w, h),
            flex_shrink: shrink,
            flex_grow: grow,
        }
    }

    fn container(children: Vec<FlexGridChild>) -> FlexGridContainer {
        FlexGridContainer {
            selector: "div.row".to_string(),
            bounds: BoundingBox::new(0.0, 0.0, 300.0, 100.0),
            is_flex: true,
            is_grid: false,
            flex_direction: Some("row".to_string()),
            flex_wrap: Some("nowrap".to_string()),
            grid_template_columns: None,
            grid_template_rows: None,
            gap: None,
            row_gap: None,
            column_gap: None,
            overflow_hidden: false,
            children,
        }
    }

    #[test]
    fn nowrap_overflow_detected() {
        let d = FlexGridDetector::default();
        let c = container(vec![
            child("a", 0.0, 0.0, 120.0, 50.0, 0.0, 1.0),
            child("b", 120.0, 0.0, 120.0, 50.0, 0.0, 1.0),
            child("c", 240.0, 0.0, 120.0, 50.0, 0.0, 1.0),
            child("d", 360.0, 0.0, 120.0, 50.0, 0.0, 1.0),
        ]);
        let issues = d.check_flex(&c);
        assert!(issues.iter().any(|i| i.message.contains("without flex-wrap")));
    }

    #[test]
    fn squeezed_child_detected() {
        let d = FlexGridDetector::default();
        let c = container(vec![child("a", 0.0, 0.0, 5.0, 50.0, 1.0, 0.0)]);
        let issues = d.check_flex(&c);
        let squeezed = issues.iter().find(|i| i.message.contains("squeezed"));
        assert!(squeezed.is_some());
        assert_eq!(squeezed.unwrap().severity, Severity::Major);
    }

    #[test]
    fn coefficient_of_variation_matches_hand_calc() {
        let cv = coefficient_of_variation(&[10.0, 10.0, 40.0]);
        assert!((cv - 0.7071).abs() < 0.01);
    }

    #[test]
    fn missing_gap_in_grid_is_reported() {
        let d = FlexGridDetector::default();
        let mut c = container(vec![
            child("a", 0.0, 0.0, 50.0, 50.0, 0.0, 0.0),
            child("b", 50.0, 0.0, 50.0, 50.0, 0.0, 0.0),
            child("c", 100.0, 0.0, 50.0, 50.0, 0.0, 0.0),
        ]);
        c.is_flex = false;
        c.is_grid = true;
        c.grid_template_columns = Some("1fr 1fr 1fr".to_string());
        let issues = d.check_grid(&c);
        assert!(issues.iter().any(|i| i.message.contains("no gap property")));
    }
}
