//! Audit result aggregation.

use crate::issue::{Issue, IssueKind, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Browser viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: u32,
    /// Height in CSS pixels.
    pub height: u32,
}

impl Viewport {
    /// 1920x1080.
    pub const DESKTOP: Viewport = Viewport {
        width: 1920,
        height: 1080,
    };
    /// 768x1024.
    pub const TABLET: Viewport = Viewport {
        width: 768,
        height: 1024,
    };
    /// 375x667.
    pub const MOBILE: Viewport = Viewport {
        width: 375,
        height: 667,
    };
}

/// Summary counters over a set of issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueMetadata {
    /// Total number of issues.
    pub total_issues_found: usize,
    /// Count of `critical` severity issues.
    pub critical_issues: usize,
    /// Count of `major` severity issues.
    pub major_issues: usize,
    /// Count of `minor` severity issues.
    pub minor_issues: usize,
    /// Count of issues per kind. Every known kind is present, even with
    /// a zero count, so consumers never need to treat a missing key as
    /// zero.
    pub issues_by_type: BTreeMap<IssueKind, usize>,
}

impl IssueMetadata {
    /// Derive metadata by partitioning `issues` by severity and by kind.
    ///
    /// This is the sole place severity/kind counters are computed, so
    /// they equal the partition of `issues` by construction.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut issues_by_type: BTreeMap<IssueKind, usize> =
            IssueKind::ALL.iter().map(|k| (*k, 0)).collect();
        let mut critical = 0;
        let mut major = 0;
        let mut minor = 0;

        for issue in issues {
            *issues_by_type.entry(issue.kind).or_insert(0) += 1;
            match issue.severity {
                Severity::Critical => critical += 1,
                Severity::Major => major += 1,
                Severity::Minor => minor += 1,
            }
        }

        Self {
            total_issues_found: issues.len(),
            critical_issues: critical,
            major_issues: major,
            minor_issues: minor,
            issues_by_type,
        }
    }

    /// Combine several per-URL metadata summaries into one aggregate.
    pub fn aggregate<'a>(all: impl IntoIterator<Item = &'a IssueMetadata>) -> Self {
        let mut issues_by_type: BTreeMap<IssueKind, usize> =
            IssueKind::ALL.iter().map(|k| (*k, 0)).collect();
        let mut total = 0;
        let mut critical = 0;
        let mut major = 0;
        let mut minor = 0;

        for metadata in all {
            total += metadata.total_issues_found;
            critical += metadata.critical_issues;
            major += metadata.major_issues;
            minor += metadata.minor_issues;
            for (kind, count) in &metadata.issues_by_type {
                *issues_by_type.entry(*kind).or_insert(0) += count;
            }
        }

        Self {
            total_issues_found: total,
            critical_issues: critical,
            major_issues: major,
            minor_issues: minor,
            issues_by_type,
        }
    }
}

/// The audit result for a single URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// The URL that was audited.
    pub url: String,
    /// When the audit ran, RFC3339.
    pub timestamp: DateTime<Utc>,
    /// Viewport used to render the page.
    pub viewport: Viewport,
    /// All issues found by the configured detectors, in run order.
    pub issues: Vec<Issue>,
    /// Summary counters, see [`IssueMetadata`].
    pub metadata: IssueMetadata,
}

impl AuditResult {
    /// Build an audit result from a finished detector run.
    pub fn new(url: impl Into<String>, viewport: Viewport, issues: Vec<Issue>) -> Self {
        let metadata = IssueMetadata::from_issues(&issues);
        Self {
            url: url.into(),
            timestamp: Utc::now(),
            viewport,
            issues,
            metadata,
        }
    }
}

/// Crawl-specific summary, carried alongside a [`MultiUrlAuditResult`]
/// when the run was a crawl rather than a fixed URL list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlMetadata {
    /// The seed URL the crawl started from.
    pub start_url: String,
    /// The greatest depth any completed page reached.
    pub max_depth_reached: u32,
    /// Total number of pages discovered (enqueued at least once).
    pub total_pages_discovered: u64,
    /// Pages dropped by the frontier's caps before being processed.
    pub pages_skipped: u64,
    /// Total wall-clock duration of the crawl, in milliseconds.
    pub crawl_duration_ms: i64,
    /// Mean processing duration over completed pages with a duration,
    /// in milliseconds.
    pub average_page_time_ms: f64,
    /// Number of pages that completed successfully.
    pub successful_pages: u64,
    /// Number of pages that failed.
    pub failed_pages: u64,
}

/// The result of auditing multiple URLs, whether from a fixed list or
/// a crawl.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiUrlAuditResult {
    /// One result per successfully audited URL.
    pub results: Vec<AuditResult>,
    /// Aggregate counters across all results.
    pub summary: IssueMetadata,
    /// Present and `true` only when the run stopped early on a critical
    /// issue with `exitEarly` set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exited_early: Option<bool>,
    /// Present only for crawl-mode runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl_metadata: Option<CrawlMetadata>,
}

impl MultiUrlAuditResult {
    /// Build a multi-URL result, deriving the aggregate summary from
    /// `results`.
    pub fn new(results: Vec<AuditResult>) -> Self {
        let summary = IssueMetadata::aggregate(results.iter().map(|r| &r.metadata));
        Self {
            results,
            summary,
            exited_early: None,
            crawl_metadata: None,
        }
    }

    /// Mark this result as having exited early.
    pub fn with_exited_early(mut self) -> Self {
        self.exited_early = Some(true);
        self
    }

    /// Attach crawl metadata.
    pub fn with_crawl_metadata(mut self, metadata: CrawlMetadata) -> Self {
        self.crawl_metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::ElementLocation;
    use crate::geometry::BoundingBox;

    fn sample_issue(kind: IssueKind, severity: Severity) -> Issue {
        Issue::new(
            kind,
            severity,
            "test",
            vec![ElementLocation::new(
                "#a",
                BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            )],
        )
    }

    #[test]
    fn metadata_partitions_by_severity_and_type() {
        let issues = vec![
            sample_issue(IssueKind::Overlap, Severity::Critical),
            sample_issue(IssueKind::Overlap, Severity::Minor),
            sample_issue(IssueKind::Spacing, Severity::Major),
        ];
        let metadata = IssueMetadata::from_issues(&issues);
        assert_eq!(metadata.total_issues_found, 3);
        assert_eq!(metadata.critical_issues, 1);
        assert_eq!(metadata.major_issues, 1);
        assert_eq!(metadata.minor_issues, 1);
        assert_eq!(metadata.issues_by_type[&IssueKind::Overlap], 2);
        assert_eq!(metadata.issues_by_type[&IssueKind::Spacing], 1);
        assert_eq!(metadata.issues_by_type[&IssueKind::Scrollbar], 0);
    }

    #[test]
    fn aggregate_sums_across_results() {
        let m1 = IssueMetadata::from_issues(&[sample_issue(IssueKind::Overlap, Severity::Critical)]);
        let m2 = IssueMetadata::from_issues(&[sample_issue(IssueKind::Overlap, Severity::Minor)]);
        let agg = IssueMetadata::aggregate([&m1, &m2]);
        assert_eq!(agg.total_issues_found, 2);
        assert_eq!(agg.issues_by_type[&IssueKind::Overlap], 2);
    }
}
