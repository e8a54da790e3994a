//! Shared data model for the domsentry visual auditor.
//!
//! Pure value types with no I/O: URL/queue records, geometry, issues,
//! audit results, page results, and run configuration. Every type here
//! is `Serialize`/`Deserialize` so it can cross the CLI's JSON boundary
//! unchanged.

pub mod audit;
pub mod config;
pub mod error;
pub mod geometry;
pub mod issue;
pub mod page_result;
pub mod url_record;

pub use audit::{AuditResult, CrawlMetadata, IssueMetadata, MultiUrlAuditResult, Viewport};
pub use config::{parse_detector_list, Config, CrawlConfig, DetectorName};
pub use error::{AuditError, Result};
pub use geometry::BoundingBox;
pub use issue::{ElementLocation, Issue, IssueKind, OverflowAmount, OverlapArea, Severity};
pub use page_result::{PageResult, PageStatus};
pub use url_record::{QueueItem, UrlRecord};
