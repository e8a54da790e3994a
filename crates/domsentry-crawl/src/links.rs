//! Link extraction: pull anchor targets out of a rendered page and
//! reduce them to the set worth following.
//!
//! Grounded on `riptide-spider/src/extractor.rs`'s pattern of treating a
//! driver-evaluated script as an opaque job that returns typed JSON,
//! with the extractor crate only responsible for decoding and filtering
//! that JSON — never for DOM traversal itself.

use crate::normalize;
use domsentry_driver::PageHandle;
use domsentry_types::{AuditError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use url::Url;

/// Driver-side script returning every `<a href>`/`<area href>` whose
/// target is non-empty and not a same-page fragment link.
const EXTRACT_LINKS_SCRIPT: &str = r#"
(() => {
  const nodes = Array.from(document.querySelectorAll('a[href], area[href]'));
  return nodes
    .map((el) => ({
      href: el.getAttribute('href') || '',
      text: (el.textContent || '').trim(),
      title: el.getAttribute('title') || null,
    }))
    .filter((l) => l.href.length > 0 && !l.href.startsWith('#'));
})()
"#;

#[derive(Debug, Deserialize)]
struct RawLink {
    href: String,
    text: String,
    title: Option<String>,
}

/// A link discovered on a page, after normalization and filtering.
#[derive(Debug, Clone)]
pub struct ExtractedLink {
    pub url: String,
    pub normalized_url: String,
    pub text: String,
    pub title: Option<String>,
}

/// Configuration governing which links survive extraction.
#[derive(Debug, Clone)]
pub struct LinkExtractorConfig {
    pub include_subdomains: bool,
    pub follow_navigational_only: bool,
    pub exclude_patterns: Vec<String>,
    pub include_patterns: Vec<String>,
    pub max_links_per_page: usize,
}

impl Default for LinkExtractorConfig {
    fn default() -> Self {
        Self {
            include_subdomains: false,
            follow_navigational_only: true,
            exclude_patterns: Vec::new(),
            include_patterns: Vec::new(),
            max_links_per_page: 500,
        }
    }
}

/// Extract, normalize, and filter links from `page`, whose own URL is
/// `base`.
pub async fn extract_links(
    page: &dyn PageHandle,
    base: &Url,
    config: &LinkExtractorConfig,
) -> Result<Vec<ExtractedLink>> {
    let raw = page
        .evaluate(EXTRACT_LINKS_SCRIPT)
        .await
        .map_err(|e| AuditError::LinkExtractionFailed(e.to_string()))?;

    let raw_links: Vec<RawLink> = serde_json::from_value(raw)
        .map_err(|e| AuditError::LinkExtractionFailed(e.to_string()))?;

    if raw_links.len() > config.max_links_per_page {
        return Err(AuditError::LinkExtractionFailed(format!(
            "page has {} links, exceeding the limit of {}",
            raw_links.len(),
            config.max_links_per_page
        )));
    }

    let base_host = base.host_str().unwrap_or_default().to_string();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for link in raw_links {
        let normalized = match normalize::normalize(&link.href, Some(base)) {
            Ok(n) => n,
            Err(_) => continue,
        };
        if !seen.insert(normalized.clone()) {
            continue;
        }

        let Ok(parsed) = Url::parse(&normalized) else {
            continue;
        };
        if !normalize::is_internal(&parsed, &base_host, config.include_subdomains) {
            continue;
        }
        if config.follow_navigational_only && !normalize::is_navigational(&parsed) {
            continue;
        }

        let lower = normalized.to_ascii_lowercase();
        if config
            .exclude_patterns
            .iter()
            .any(|p| lower.contains(&p.to_ascii_lowercase()))
        {
            continue;
        }
        if !config.include_patterns.is_empty()
            && !config
                .include_patterns
                .iter()
                .any(|p| lower.contains(&p.to_ascii_lowercase()))
        {
            continue;
        }

        out.push(ExtractedLink {
            url: link.href,
            normalized_url: normalized,
            text: link.text,
            title: link.title,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_link_decodes_from_driver_json() {
        let v: RawLink = serde_json::from_value(serde_json::json!({
            "href": "/about",
            "text": "About",
            "title": null
        }))
        .unwrap();
        assert_eq!(v.href, "/about");
        assert_eq!(v.text, "About");
        assert!(v.title.is_none());
    }

    #[test]
    fn default_config_follows_navigational_only() {
        let cfg = LinkExtractorConfig::default();
        assert!(cfg.follow_navigational_only);
        assert_eq!(cfg.max_links_per_page, 500);
    }
}
