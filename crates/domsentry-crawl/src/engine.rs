//! The crawl engine: seeds the state manager, runs the bounded-worker
//! BFS loop, and assembles the final multi-URL result.
//!
//! Grounded on `riptide-spider`'s overall shape (a frontier-driven loop
//! dispatching fetch tasks under a concurrency cap) but written fresh —
//! `riptide-spider` is wired to its own `riptide-fetch` HTTP client and
//! WASM extraction pipeline, neither of which this workspace uses.

use crate::controller::Controller;
use crate::links::{extract_links, LinkExtractorConfig};
use crate::normalize;
use crate::preparer::prepare_page;
use crate::state::CrawlState;
use async_trait::async_trait;
use domsentry_driver::{BrowserDriver, ConsoleHandler, PageErrorHandler, PageHandle};
use domsentry_types::{
    AuditResult, CrawlConfig, MultiUrlAuditResult, PageResult, PageStatus, Result, Viewport,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

/// Extra attempts `execute_task_with_retry` may take on page preparation
/// failure, beyond the first.
const MAX_PAGE_RETRIES: u32 = 2;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// Runs the configured detector pipeline against an already-prepared
/// page. Implemented by the analyzer in the detector crate; kept as a
/// trait here so the crawl engine never depends on detector internals.
#[async_trait]
pub trait PageProcessor: Send + Sync {
    async fn process(&self, page: &dyn PageHandle, url: &str) -> Result<AuditResult>;

    /// Console/page-error listener to install before navigation, when
    /// the console-error detector is enabled.
    fn console_handler(&self) -> Option<ConsoleHandler> {
        None
    }

    fn page_error_handler(&self) -> Option<PageErrorHandler> {
        None
    }
}

/// Drives a bounded-concurrency, breadth-first crawl from a single seed
/// URL.
pub struct CrawlEngine {
    driver: Arc<dyn BrowserDriver>,
    state: Arc<CrawlState>,
    controller: Arc<Controller>,
    processor: Arc<dyn PageProcessor>,
    crawl_config: CrawlConfig,
    viewport: Viewport,
    exit_early: bool,
}

impl CrawlEngine {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        crawl_config: CrawlConfig,
        viewport: Viewport,
        processor: Arc<dyn PageProcessor>,
        exit_early: bool,
    ) -> Self {
        let controller = Arc::new(Controller::new(crawl_config.max_threads as usize));
        let state = Arc::new(CrawlState::new(crawl_config.clone()));
        Self {
            driver,
            state,
            controller,
            processor,
            crawl_config,
            viewport,
            exit_early,
        }
    }

    /// Run the crawl from `seed`, returning the assembled multi-URL
    /// result once the queue and in-flight set are both empty (or a
    /// stop was signaled).
    pub async fn run(&self, seed: &str) -> Result<MultiUrlAuditResult> {
        let normalized_seed = normalize::normalize(seed, None)?;
        self.state
            .enqueue_url(seed.to_string(), normalized_seed.clone(), 0, None);

        let mut handles = Vec::new();

        while self.state.should_continue() {
            let mut spawned_this_tick = false;

            while self.state.has_urls_to_process() {
                let Some(item) = self.state.dequeue_url() else {
                    break;
                };
                spawned_this_tick = true;

                let engine = self.clone_shared();
                let handle = tokio::spawn(async move {
                    engine.run_one(item).await;
                });
                handles.push(handle);
            }

            if !spawned_this_tick {
                tokio::time::sleep(Duration::from_millis(100)).await;
            } else {
                // Give at least one spawned task a chance to reach a
                // completion point before the next scheduling tick.
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }

        while self.state.processing_count() > 0 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        for handle in handles {
            let _ = handle.await;
        }

        let results = self.state.results();
        let successful: Vec<AuditResult> = results
            .iter()
            .filter(|r| r.status == PageStatus::Completed)
            .filter_map(|r| r.audit_result.clone())
            .collect();

        let exited_early = self.state.is_stopped();
        let crawl_metadata = self.state.get_stats(seed);

        let mut out = MultiUrlAuditResult::new(successful).with_crawl_metadata(crawl_metadata);
        if exited_early {
            out = out.with_exited_early();
        }
        Ok(out)
    }

    fn clone_shared(&self) -> SharedEngine {
        SharedEngine {
            driver: self.driver.clone(),
            state: self.state.clone(),
            controller: self.controller.clone(),
            processor: self.processor.clone(),
            crawl_config: self.crawl_config.clone(),
            viewport: self.viewport,
            exit_early: self.exit_early,
        }
    }

}

/// Cloneable handle used by spawned per-URL tasks; avoids borrowing
/// `&CrawlEngine` across a `tokio::spawn` boundary.
#[derive(Clone)]
struct SharedEngine {
    driver: Arc<dyn BrowserDriver>,
    state: Arc<CrawlState>,
    controller: Arc<Controller>,
    processor: Arc<dyn PageProcessor>,
    crawl_config: CrawlConfig,
    viewport: Viewport,
    exit_early: bool,
}

impl SharedEngine {
    /// The per-URL task: prepare, analyze, extract links, record.
    async fn run_one(&self, item: domsentry_types::QueueItem) {
        let start = Instant::now();
        let mut result = PageResult::pending(item.url.clone(), item.normalized_url.clone(), item.depth);
        result.parent_url = item.parent_url.clone();

        let attempts = Arc::new(AtomicU32::new(0));
        let outcome = self
            .controller
            .execute_task_with_retry(
                &item.normalized_url,
                || {
                    let attempts = attempts.clone();
                    async move {
                        attempts.fetch_add(1, Ordering::Relaxed);
                        self.process_item(&item).await
                    }
                },
                MAX_PAGE_RETRIES,
                RETRY_BASE_DELAY,
            )
            .await;

        result.duration_ms = Some(start.elapsed().as_millis() as i64);
        result.retries = attempts.load(Ordering::Relaxed).saturating_sub(1);

        match outcome {
            Ok((audit, links_found)) => {
                result.status = PageStatus::Completed;
                result.links_found = Some(links_found);
                let critical = audit.metadata.critical_issues > 0;
                result.audit_result = Some(audit);
                if critical && self.exit_early {
                    self.state.stop();
                }
            }
            Err(err) => {
                warn!(url = %item.url, error = %err, "page processing failed");
                result.status = PageStatus::Failed;
                result.error = Some(err.to_string());
                self.state.add_error(format!("{}: {}", item.url, err));
                if self.exit_early {
                    self.state.stop();
                }
            }
        }

        self.state.complete_url(&item.normalized_url, result);
    }

    async fn process_item(&self, item: &domsentry_types::QueueItem) -> Result<(AuditResult, usize)> {
        let page = prepare_page(
            self.driver.as_ref(),
            &item.url,
            self.viewport,
            self.processor.console_handler(),
            self.processor.page_error_handler(),
        )
        .await?;

        let outcome = self.analyze_and_extract(page.as_ref(), item).await;
        let _ = page.close().await;
        outcome
    }

    async fn analyze_and_extract(
        &self,
        page: &dyn PageHandle,
        item: &domsentry_types::QueueItem,
    ) -> Result<(AuditResult, usize)> {
        let audit = self.processor.process(page, &item.url).await?;

        let mut links_found = 0;
        if item.depth < self.crawl_config.max_depth {
            if let Ok(base) = Url::parse(&item.normalized_url) {
                let link_config = LinkExtractorConfig {
                    include_subdomains: self.crawl_config.include_subdomains,
                    follow_navigational_only: true,
                    exclude_patterns: self.crawl_config.exclude_patterns.clone(),
                    include_patterns: self.crawl_config.include_patterns.clone(),
                    max_links_per_page: 500,
                };
                if let Ok(links) = extract_links(page, &base, &link_config).await {
                    links_found = links.len();
                    for link in links {
                        self.state.enqueue_url(
                            link.url,
                            link.normalized_url,
                            item.depth + 1,
                            Some(item.normalized_url.clone()),
                        );
                    }
                }
            }
        }

        info!(url = %item.url, issues = audit.issues.len(), links_found, "page processed");
        Ok((audit, links_found))
    }
}
