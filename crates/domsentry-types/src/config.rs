//! Run configuration.

use crate::audit::Viewport;
use crate::error::AuditError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

impl FromStr for Viewport {
    type Err = AuditError;

    /// Parse `desktop`, `tablet`, `mobile`, or a literal `WxH` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(Viewport::DESKTOP),
            "tablet" => Ok(Viewport::TABLET),
            "mobile" => Ok(Viewport::MOBILE),
            other => {
                let (w, h) = other.split_once('x').ok_or_else(|| {
                    AuditError::ConfigInvalid(format!(
                        "invalid viewport '{other}': expected desktop|tablet|mobile|WxH"
                    ))
                })?;
                let width: u32 = w.parse().map_err(|_| {
                    AuditError::ConfigInvalid(format!("invalid viewport width in '{other}'"))
                })?;
                let height: u32 = h.parse().map_err(|_| {
                    AuditError::ConfigInvalid(format!("invalid viewport height in '{other}'"))
                })?;
                Ok(Viewport { width, height })
            }
        }
    }
}

/// The recognized detector names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorName {
    /// Visually overlapping presentational elements.
    Overlap,
    /// Padding-specific spacing checks (a specialization of spacing).
    Padding,
    /// Insufficient gaps between sibling elements.
    Spacing,
    /// A child's rendered box overflowing its parent's.
    ContainerOverflow,
    /// Unexpected horizontal or missing vertical scrollbars.
    Scrollbar,
    /// Flex/grid containers with broken sizing, wrapping, or gaps.
    FlexGrid,
    /// Disabled by default; must be requested explicitly.
    Centering,
    /// Uncaught console errors and page errors.
    ConsoleError,
}

impl DetectorName {
    /// All known detector names, in their canonical listing order.
    pub const ALL: [DetectorName; 8] = [
        DetectorName::Overlap,
        DetectorName::Padding,
        DetectorName::Spacing,
        DetectorName::ContainerOverflow,
        DetectorName::Scrollbar,
        DetectorName::FlexGrid,
        DetectorName::Centering,
        DetectorName::ConsoleError,
    ];

    /// The default set: everything except `centering`.
    pub fn defaults() -> Vec<DetectorName> {
        Self::ALL
            .into_iter()
            .filter(|d| *d != DetectorName::Centering)
            .collect()
    }

    /// The CLI's textual name for this detector (kebab-case).
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorName::Overlap => "overlap",
            DetectorName::Padding => "padding",
            DetectorName::Spacing => "spacing",
            DetectorName::ContainerOverflow => "container-overflow",
            DetectorName::Scrollbar => "scrollbar",
            DetectorName::FlexGrid => "flex-grid",
            DetectorName::Centering => "centering",
            DetectorName::ConsoleError => "console-error",
        }
    }
}

impl FromStr for DetectorName {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|d| d.as_str()).collect();
                AuditError::ConfigInvalid(format!(
                    "unknown detector '{s}', known detectors: {}",
                    known.join(", ")
                ))
            })
    }
}

/// Crawl-mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Maximum link depth from the seed, 1–10.
    pub max_depth: u32,
    /// Maximum number of pages to process, 1–1000.
    pub max_pages: u32,
    /// Maximum number of concurrently processing pages, 1–10.
    pub max_threads: u32,
    /// Whether subdomains of the base host count as internal.
    pub include_subdomains: bool,
    /// Case-insensitive substrings; a link matching any is dropped.
    pub exclude_patterns: Vec<String>,
    /// Case-insensitive substrings; when non-empty, only matching links
    /// are kept.
    pub include_patterns: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_pages: 50,
            max_threads: 3,
            include_subdomains: false,
            exclude_patterns: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

impl CrawlConfig {
    /// Validate the documented ranges, returning a [`AuditError::ConfigInvalid`]
    /// describing the first violation found.
    pub fn validate(&self) -> Result<(), AuditError> {
        if !(1..=10).contains(&self.max_depth) {
            return Err(AuditError::ConfigInvalid(
                "max-depth must be between 1 and 10".into(),
            ));
        }
        if !(1..=1000).contains(&self.max_pages) {
            return Err(AuditError::ConfigInvalid(
                "max-pages must be between 1 and 1000".into(),
            ));
        }
        if !(1..=10).contains(&self.max_threads) {
            return Err(AuditError::ConfigInvalid(
                "max-threads must be between 1 and 10".into(),
            ));
        }
        Ok(())
    }
}

/// Top-level run configuration, derived from CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URLs to audit. In crawl mode this holds exactly one seed URL.
    pub urls: Vec<String>,
    /// Rendering viewport.
    pub viewport: Viewport,
    /// Output format; only `"json"` is accepted.
    pub format: String,
    /// Where to write the result; `None` means stdout.
    pub save: Option<PathBuf>,
    /// Stop the whole run on the first critical issue.
    pub exit_early: bool,
    /// Detectors to run, a subset of [`DetectorName::ALL`].
    pub detectors: Vec<DetectorName>,
    /// Verbose logging.
    pub verbose: bool,
    /// Present only when `--crawl` was given.
    pub crawl: Option<CrawlConfig>,
}

impl Config {
    /// Validate cross-field rules not expressible per-flag: format must
    /// be `json`; crawl mode requires exactly one URL; at least one URL
    /// must be given.
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.format != "json" {
            return Err(AuditError::ConfigInvalid(format!(
                "unsupported output format '{}', only 'json' is accepted",
                self.format
            )));
        }
        if self.urls.is_empty() {
            return Err(AuditError::ConfigInvalid(
                "at least one URL is required".into(),
            ));
        }
        if self.crawl.is_some() && self.urls.len() != 1 {
            return Err(AuditError::ConfigInvalid(
                "Crawling mode only supports a single starting URL".into(),
            ));
        }
        if let Some(crawl) = &self.crawl {
            crawl.validate()?;
        }
        Ok(())
    }
}

/// Parse a comma/space-separated detector list, dropping empty tokens
/// (e.g. `"overlap, , spacing, ,"` → `["overlap","spacing"]`).
pub fn parse_detector_list(raw: &str) -> Result<Vec<DetectorName>, AuditError> {
    raw.split([',', ' '])
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .map(DetectorName::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_parses_named_presets() {
        assert_eq!("desktop".parse::<Viewport>().unwrap(), Viewport::DESKTOP);
        assert_eq!("mobile".parse::<Viewport>().unwrap(), Viewport::MOBILE);
    }

    #[test]
    fn viewport_parses_custom_dimensions() {
        let vp: Viewport = "1024x768".parse().unwrap();
        assert_eq!(vp.width, 1024);
        assert_eq!(vp.height, 768);
    }

    #[test]
    fn viewport_zero_by_zero_is_accepted_as_custom() {
        let vp: Viewport = "0x0".parse().unwrap();
        assert_eq!(vp.width, 0);
        assert_eq!(vp.height, 0);
    }

    #[test]
    fn detector_list_drops_empty_tokens() {
        let parsed = parse_detector_list("overlap, , spacing, ,").unwrap();
        assert_eq!(
            parsed,
            vec![DetectorName::Overlap, DetectorName::Spacing]
        );
    }

    #[test]
    fn unknown_detector_name_rejected_with_known_list() {
        let err = parse_detector_list("bogus").unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn crawl_with_multiple_urls_is_rejected() {
        let config = Config {
            urls: vec!["https://a.com".into(), "https://b.com".into()],
            viewport: Viewport::DESKTOP,
            format: "json".into(),
            save: None,
            exit_early: false,
            detectors: DetectorName::defaults(),
            verbose: false,
            crawl: Some(CrawlConfig::default()),
        };
        let err = config.validate().unwrap_err();
        assert!(err
            .to_string()
            .contains("Crawling mode only supports a single starting URL"));
    }

    #[test]
    fn centering_excluded_from_defaults() {
        assert!(!DetectorName::defaults().contains(&DetectorName::Centering));
    }
}
