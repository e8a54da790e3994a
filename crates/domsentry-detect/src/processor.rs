//! Adapter wiring the analyzer into [`domsentry_crawl::PageProcessor`],
//! so the crawl engine can drive detector runs without depending on
//! this crate's internals.

use crate::analyzer::Analyzer;
use crate::console_error::ConsoleErrorDetector;
use async_trait::async_trait;
use domsentry_crawl::PageProcessor;
use domsentry_driver::{ConsoleHandler, PageErrorHandler, PageHandle};
use domsentry_types::{AuditResult, Result};
use std::sync::Arc;

/// Implements [`PageProcessor`] by delegating to an [`Analyzer`]. Holds
/// its own reference to the console-error detector (when configured) so
/// it can hand the crawl engine listener closures to install before
/// navigation.
pub struct DetectorPageProcessor {
    analyzer: Analyzer,
    console_detector: Option<Arc<ConsoleErrorDetector>>,
}

impl DetectorPageProcessor {
    pub fn new(analyzer: Analyzer, console_detector: Option<Arc<ConsoleErrorDetector>>) -> Self {
        Self {
            analyzer,
            console_detector,
        }
    }
}

#[async_trait]
impl PageProcessor for DetectorPageProcessor {
    async fn process(&self, page: &dyn PageHandle, url: &str) -> Result<AuditResult> {
        Ok(self.analyzer.analyze(page, url).await)
    }

    fn console_handler(&self) -> Option<ConsoleHandler> {
        self.console_detector.as_ref().map(|d| d.console_handler())
    }

    fn page_error_handler(&self) -> Option<PageErrorHandler> {
        self.console_detector.as_ref().map(|d| d.page_error_handler())
    }
}
