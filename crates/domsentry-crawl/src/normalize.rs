//! URL normalization and classification.
//!
//! Grounded on `riptide-spider/src/config.rs`'s `UrlProcessingConfig`
//! (the shape of "what counts as the same URL, what counts as
//! in-scope") and its general idiom of leaning on the `url` crate
//! rather than hand-rolled parsing.

use domsentry_types::{AuditError, Result};
use url::Url;

/// Query parameters stripped during normalization, matched
/// case-insensitively against the raw parameter name.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "gclsrc",
    "dclid",
    "msclkid",
    "twclid",
    "_ga",
    "_gl",
    "mc_cid",
    "mc_eid",
    "ref",
    "referrer",
];

/// File extensions that mark a URL as a non-navigational asset.
const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "avif", "css", "js", "mjs", "json",
    "woff", "woff2", "ttf", "eot", "otf", "zip", "tar", "gz", "rar", "7z", "mp3", "mp4", "webm",
    "avi", "mov", "wav", "ogg", "pdf",
];

/// URL path substrings that mark a URL as a non-navigational endpoint
/// even without a recognized asset extension.
const NON_NAVIGATIONAL_SEGMENTS: &[&str] = &[
    "/api/",
    "/rest/",
    "/graphql",
    "/webhook",
    "/_next/",
    "/static/",
    "/assets/",
];

/// Parse `raw` as an absolute URL (resolving against `base` when given)
/// and canonicalize it per the rules in the data model: lowercase host,
/// upgrade `http -> https` unless the host is `localhost`, drop the
/// fragment, strip known tracking parameters, sort the remaining query
/// parameters, and drop a trailing slash except on the root path.
///
/// Returns the normalized string. Two raw URLs are the same crawl
/// target iff their normalized forms are byte-equal.
pub fn normalize(raw: &str, base: Option<&Url>) -> Result<String> {
    let parsed = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    }
    .map_err(|e| AuditError::NormalizeFailed {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    let mut url = parsed;

    let host = url
        .host_str()
        .ok_or_else(|| AuditError::NormalizeFailed {
            url: raw.to_string(),
            reason: "URL has no host".to_string(),
        })?
        .to_ascii_lowercase();

    if url.scheme() == "http" && host != "localhost" {
        url.set_scheme("https")
            .map_err(|_| AuditError::NormalizeFailed {
                url: raw.to_string(),
                reason: "failed to upgrade scheme to https".to_string(),
            })?;
    }
    url.set_host(Some(&host))
        .map_err(|e| AuditError::NormalizeFailed {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

    url.set_fragment(None);

    let mut kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !TRACKING_PARAMS.iter().any(|t| t.eq_ignore_ascii_case(k)))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    kept.sort_by(|a, b| a.0.cmp(&b.0));
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&kept);
    }

    if url.path().len() > 1 && url.path().ends_with('/') {
        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    Ok(url.to_string())
}

/// Whether `url` belongs to the crawl's scope: same protocol and host as
/// `base_host`, or (when `include_subdomains`) a subdomain of it.
pub fn is_internal(url: &Url, base_host: &str, include_subdomains: bool) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let base_host = base_host.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();
    if host == base_host {
        return true;
    }
    include_subdomains && host.ends_with(&format!(".{base_host}"))
}

/// Whether `url` points at a navigable page rather than a static asset
/// or non-HTML endpoint.
pub fn is_navigational(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();

    if let Some(ext) = path.rsplit('.').next() {
        if path.contains('.') && ASSET_EXTENSIONS.contains(&ext) {
            return false;
        }
    }

    !NON_NAVIGATIONAL_SEGMENTS.iter().any(|seg| path.contains(seg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrades_http_to_https_except_localhost() {
        assert_eq!(
            normalize("http://Example.com/a", None).unwrap(),
            "https://example.com/a"
        );
        assert_eq!(
            normalize("http://localhost:8080/a", None).unwrap(),
            "http://localhost:8080/a"
        );
    }

    #[test]
    fn strips_tracking_params_and_sorts_remaining() {
        let got = normalize(
            "https://example.com/page?z=1&utm_source=x&a=2&fbclid=y",
            None,
        )
        .unwrap();
        assert_eq!(got, "https://example.com/page?a=2&z=1");
    }

    #[test]
    fn drops_fragment_and_trailing_slash() {
        assert_eq!(
            normalize("https://example.com/page/#section", None).unwrap(),
            "https://example.com/page"
        );
        assert_eq!(normalize("https://example.com/", None).unwrap(), "https://example.com/");
    }

    #[test]
    fn resolves_relative_against_base() {
        let base = Url::parse("https://example.com/dir/page").unwrap();
        assert_eq!(
            normalize("../other", Some(&base)).unwrap(),
            "https://example.com/other"
        );
    }

    #[test]
    fn rejects_unparseable_input() {
        assert!(normalize("not a url at all", None).is_err());
    }

    #[test]
    fn classifies_internal_and_subdomains() {
        let url = Url::parse("https://blog.example.com/x").unwrap();
        assert!(!is_internal(&url, "example.com", false));
        assert!(is_internal(&url, "example.com", true));
    }

    #[test]
    fn classifies_navigational_vs_assets() {
        let html = Url::parse("https://example.com/about").unwrap();
        let image = Url::parse("https://example.com/logo.png").unwrap();
        let api = Url::parse("https://example.com/api/v1/users").unwrap();
        assert!(is_navigational(&html));
        assert!(!is_navigational(&image));
        assert!(!is_navigational(&api));
    }
}
