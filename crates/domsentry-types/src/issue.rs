//! Issue records produced by detectors.

use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};

/// Severity grade for an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic but low-risk.
    Minor,
    /// Likely to be noticed by users.
    Major,
    /// Breaks the page's usability or layout outright.
    Critical,
}

/// The kind of defect an [`Issue`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Two presentational elements visually overlap.
    Overlap,
    /// Insufficient spacing/margin around an element.
    Padding,
    /// Insufficient spacing between sibling elements.
    Spacing,
    /// A child overflows its container's bounds.
    ContainerOverflow,
    /// An unexpected horizontal or vertical scrollbar appeared.
    Scrollbar,
    /// A flex/grid container has a layout defect.
    Layout,
    /// An element is not centered as its layout implies it should be.
    Centering,
    /// A console or page JavaScript error/warning was captured.
    ConsoleError,
}

impl IssueKind {
    /// All known kinds.
    pub const ALL: [IssueKind; 8] = [
        IssueKind::Overlap,
        IssueKind::Padding,
        IssueKind::Spacing,
        IssueKind::ContainerOverflow,
        IssueKind::Scrollbar,
        IssueKind::Layout,
        IssueKind::Centering,
        IssueKind::ConsoleError,
    ];
}

/// The location of one element participating in an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementLocation {
    /// CSS selector (or selector-like description) identifying the element.
    pub selector: String,
    /// The element's bounding box at detection time.
    pub bounds: BoundingBox,
    /// Trimmed text content, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

impl ElementLocation {
    /// Construct a new element location without text content.
    pub fn new(selector: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            selector: selector.into(),
            bounds,
            text_content: None,
        }
    }

    /// Attach trimmed text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }
}

/// Overlap area between two elements, carried on overlap issues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapArea {
    /// Overlap width in px.
    pub width: f64,
    /// Overlap height in px.
    pub height: f64,
    /// Overlap area as a percentage of the smaller element's area.
    pub percentage: f64,
}

/// Per-side overflow distances, carried on container-overflow issues.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OverflowAmount {
    /// Overflow past the parent's top edge.
    pub top: f64,
    /// Overflow past the parent's left edge.
    pub left: f64,
    /// Overflow past the parent's right edge.
    pub right: f64,
    /// Overflow past the parent's bottom edge.
    pub bottom: f64,
}

impl OverflowAmount {
    /// The largest of the four overflow distances.
    pub fn max_side(&self) -> f64 {
        self.top.max(self.left).max(self.right).max(self.bottom)
    }

    /// Whether all four sides are flush (no overflow at all).
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.left == 0.0 && self.right == 0.0 && self.bottom == 0.0
    }
}

/// A single defect record.
///
/// All variants share `{type, severity, message, elements}`; kind-specific
/// fields are optional and populated only by the detector that produces
/// that kind (e.g. only overlap issues carry `overlap_area`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// The issue's kind, serialized as `"type"`.
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Severity grade.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Elements involved in the defect.
    pub elements: Vec<ElementLocation>,
    /// Overlap geometry, present only on [`IssueKind::Overlap`] issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_area: Option<OverlapArea>,
    /// Per-side overflow, present only on [`IssueKind::ContainerOverflow`] issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_amount: Option<OverflowAmount>,
    /// Measured gap, present only on [`IssueKind::Spacing`]/[`IssueKind::Padding`] issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_spacing: Option<f64>,
    /// Minimum acceptable gap, present only alongside `actual_spacing`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_spacing: Option<f64>,
    /// Documented horizontal/vertical scrollbar overflow in px.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_px: Option<f64>,
}

impl Issue {
    /// Construct a bare issue with just the shared fields.
    pub fn new(
        kind: IssueKind,
        severity: Severity,
        message: impl Into<String>,
        elements: Vec<ElementLocation>,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            elements,
            overlap_area: None,
            overflow_amount: None,
            actual_spacing: None,
            recommended_spacing: None,
            overflow_px: None,
        }
    }

    /// Attach overlap geometry.
    pub fn with_overlap_area(mut self, area: OverlapArea) -> Self {
        self.overlap_area = Some(area);
        self
    }

    /// Attach container-overflow geometry.
    pub fn with_overflow_amount(mut self, overflow: OverflowAmount) -> Self {
        self.overflow_amount = Some(overflow);
        self
    }

    /// Attach measured vs. recommended spacing.
    pub fn with_spacing(mut self, actual: f64, recommended: f64) -> Self {
        self.actual_spacing = Some(actual);
        self.recommended_spacing = Some(recommended);
        self
    }

    /// Attach a scrollbar overflow measurement in px.
    pub fn with_overflow_px(mut self, px: f64) -> Self {
        self.overflow_px = Some(px);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_type_serializes_as_kebab_case() {
        let issue = Issue::new(
            IssueKind::ContainerOverflow,
            Severity::Major,
            "child overflows parent",
            vec![],
        );
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "container-overflow");
        assert_eq!(json["severity"], "major");
        assert!(json.get("overlapArea").is_none());
    }

    #[test]
    fn overflow_amount_max_side() {
        let overflow = OverflowAmount {
            top: 0.0,
            left: 0.0,
            right: 50.0,
            bottom: 10.0,
        };
        assert_eq!(overflow.max_side(), 50.0);
        assert!(!overflow.is_zero());
    }
}
