//! Orchestration: builds the detector pipeline and browser driver from
//! a validated [`Config`], then drives either a fixed URL list or a
//! crawl.

use anyhow::{Context, Result};
use domsentry_crawl::{prepare_page, CrawlEngine};
use domsentry_detect::{
    Analyzer, CenteringDetector, ConsoleErrorDetector, ContainerOverflowDetector, Detector,
    DetectorPageProcessor, FlexGridDetector, OverlapConfig, OverlapDetector, PaddingDetector,
    ScrollbarDetector, SpacingDetector,
};
use domsentry_driver::{BrowserDriver, CdpBrowser};
use domsentry_types::{AuditResult, Config, DetectorName, MultiUrlAuditResult};
use std::sync::Arc;

fn build_detectors(names: &[DetectorName]) -> (Vec<Box<dyn Detector>>, Option<Arc<ConsoleErrorDetector>>) {
    let mut detectors: Vec<Box<dyn Detector>> = Vec::new();
    let mut console_detector = None;

    // NODE_ENV=test disables the header-overlap sweep short-circuit so
    // overlap results stay deterministic under test harnesses.
    let test_mode = std::env::var("NODE_ENV").map(|v| v == "test").unwrap_or(false);

    for name in names {
        match name {
            DetectorName::Overlap => detectors.push(Box::new(OverlapDetector::new(OverlapConfig {
                test_mode,
                ..OverlapConfig::default()
            }))),
            DetectorName::Padding => detectors.push(Box::new(PaddingDetector::default())),
            DetectorName::Spacing => detectors.push(Box::new(SpacingDetector::default())),
            DetectorName::ContainerOverflow => detectors.push(Box::new(ContainerOverflowDetector::default())),
            DetectorName::Scrollbar => detectors.push(Box::new(ScrollbarDetector::default())),
            DetectorName::FlexGrid => detectors.push(Box::new(FlexGridDetector::default())),
            DetectorName::Centering => detectors.push(Box::new(CenteringDetector::default())),
            DetectorName::ConsoleError => {
                let detector = Arc::new(ConsoleErrorDetector::new(Default::default()));
                detectors.push(Box::new(detector.clone()));
                console_detector = Some(detector);
            }
        }
    }

    (detectors, console_detector)
}

/// Run the whole configured audit: either a fixed URL list or a crawl.
pub async fn execute(config: &Config) -> Result<MultiUrlAuditResult> {
    let browser = CdpBrowser::launch().await.context("launching browser")?;
    let driver: Arc<dyn BrowserDriver> = Arc::new(browser);
    let (detectors, console_detector) = build_detectors(&config.detectors);
    let analyzer = Analyzer::new(detectors, config.viewport);
    let processor = Arc::new(DetectorPageProcessor::new(analyzer, console_detector));

    let result = if let Some(crawl_config) = &config.crawl {
        let seed = config.urls.first().expect("crawl mode validated to carry exactly one URL");
        let engine = CrawlEngine::new(driver.clone(), crawl_config.clone(), config.viewport, processor, config.exit_early);
        engine.run(seed).await?
    } else {
        run_fixed_list(driver.as_ref(), config, processor.as_ref()).await?
    };

    driver.close().await.context("closing browser")?;
    Ok(result)
}

async fn run_fixed_list(
    driver: &dyn BrowserDriver,
    config: &Config,
    processor: &DetectorPageProcessor,
) -> Result<MultiUrlAuditResult> {
    use domsentry_crawl::PageProcessor;

    let mut results: Vec<AuditResult> = Vec::new();
    for url in &config.urls {
        let page = prepare_page(
            driver,
            url,
            config.viewport,
            processor.console_handler(),
            processor.page_error_handler(),
        )
        .await;

        let page = match page {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(url, error = %err, "page preparation failed, skipping");
                if config.exit_early {
                    break;
                }
                continue;
            }
        };

        let audit = processor.process(page.as_ref(), url).await;
        let _ = page.close().await;

        match audit {
            Ok(audit) => {
                let critical = audit.metadata.critical_issues > 0;
                results.push(audit);
                if critical && config.exit_early {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "page analysis failed, skipping");
                if config.exit_early {
                    break;
                }
            }
        }
    }

    let exited_early = config.exit_early && results.iter().any(|r| r.metadata.critical_issues > 0);
    let mut out = MultiUrlAuditResult::new(results);
    if exited_early {
        out = out.with_exited_early();
    }
    Ok(out)
}
