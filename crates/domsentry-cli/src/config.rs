//! Turns parsed CLI flags into a validated [`domsentry_types::Config`],
//! erroring before any browser work starts.

use crate::cli::Cli;
use domsentry_types::{parse_detector_list, AuditError, Config, CrawlConfig, DetectorName, Viewport};

pub fn build_config(cli: &Cli) -> Result<Config, AuditError> {
    let mut urls = Vec::new();
    if let Some(url) = &cli.url {
        urls.push(url.clone());
    }
    urls.extend(cli.urls.iter().cloned());

    if cli.url.is_some() && !cli.urls.is_empty() {
        return Err(AuditError::ConfigInvalid(
            "--url and --urls are mutually exclusive".into(),
        ));
    }

    let viewport: Viewport = cli
        .viewport
        .parse()
        .map_err(|_| AuditError::ConfigInvalid(format!("invalid viewport '{}'", cli.viewport)))?;

    let detectors = match &cli.detectors {
        Some(raw) => parse_detector_list(raw)?,
        None => DetectorName::defaults(),
    };

    let crawl = if cli.crawl {
        Some(CrawlConfig {
            max_depth: cli.max_depth,
            max_pages: cli.max_pages,
            max_threads: cli.max_threads,
            include_subdomains: cli.include_subdomains,
            exclude_patterns: cli.exclude_patterns.clone(),
            include_patterns: cli.include_patterns.clone(),
        })
    } else {
        None
    };

    let config = Config {
        urls,
        viewport,
        format: cli.format.clone(),
        save: cli.save.clone(),
        exit_early: cli.exit_early,
        detectors,
        verbose: cli.verbose,
        crawl,
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["domsentry"];
        full.extend(args);
        Cli::parse_from(full)
    }

    #[test]
    fn single_url_builds_a_valid_config() {
        let cli = parse(&["--url", "https://example.com"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.urls, vec!["https://example.com"]);
        assert_eq!(config.viewport, Viewport::DESKTOP);
    }

    #[test]
    fn url_and_urls_together_is_rejected() {
        let cli = parse(&["--url", "https://a.com", "--urls", "https://b.com"]);
        let err = build_config(&cli).unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn crawl_mode_requires_single_url() {
        let cli = parse(&["--urls", "https://a.com,https://b.com", "--crawl"]);
        let err = build_config(&cli).unwrap_err();
        assert!(err.to_string().contains("single starting URL"));
    }

    #[test]
    fn centering_is_excluded_by_default() {
        let cli = parse(&["--url", "https://example.com"]);
        let config = build_config(&cli).unwrap();
        assert!(!config.detectors.contains(&DetectorName::Centering));
    }
}
