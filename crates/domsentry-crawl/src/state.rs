//! Crawl state manager: visited/processing sets, the depth-priority
//! queue, accumulated results, and run statistics, all behind a single
//! lock.
//!
//! Grounded on `riptide-utils/src/circuit_breaker.rs`'s "one small
//! struct, one lock, no method ever awaits" discipline, adapted from
//! atomics (the circuit breaker's state fits a handful of integers) to a
//! `std::sync::Mutex<Inner>` here, since the queue and result vectors
//! don't fit lock-free primitives as cleanly.

use domsentry_types::{CrawlMetadata, CrawlConfig, PageResult, PageStatus, QueueItem};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Instant;

struct Inner {
    visited: HashSet<String>,
    queue: Vec<QueueItem>,
    queued_urls: HashSet<String>,
    processing: HashSet<String>,
    results: Vec<PageResult>,
    errors: Vec<String>,
    total_pages_discovered: u64,
    pages_skipped: u64,
    stopped: bool,
    next_discovered_at: u64,
}

/// Owns all mutable crawl state. Every method takes the lock, runs a
/// synchronous critical section, and returns — no method ever suspends,
/// so the lock is never held across an `.await`.
pub struct CrawlState {
    inner: Mutex<Inner>,
    config: CrawlConfig,
    start_time: Instant,
}

impl CrawlState {
    pub fn new(config: CrawlConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                visited: HashSet::new(),
                queue: Vec::new(),
                queued_urls: HashSet::new(),
                processing: HashSet::new(),
                results: Vec::new(),
                errors: Vec::new(),
                total_pages_discovered: 0,
                pages_skipped: 0,
                stopped: false,
                next_discovered_at: 0,
            }),
            config,
            start_time: Instant::now(),
        }
    }

    /// Attempt to enqueue a discovered URL. Returns `false` (and, for
    /// the depth/capacity cases, increments `pages_skipped`) when the
    /// URL is already known, too deep, or would exceed `max_pages`.
    pub fn enqueue_url(
        &self,
        url: String,
        normalized: String,
        depth: u32,
        parent_url: Option<String>,
    ) -> bool {
        let mut inner = self.inner.lock().unwrap();

        if inner.visited.contains(&normalized) || inner.queued_urls.contains(&normalized) {
            return false;
        }
        if depth > self.config.max_depth {
            inner.pages_skipped += 1;
            return false;
        }
        if (inner.results.len() + inner.queue.len()) as u32 >= self.config.max_pages {
            inner.pages_skipped += 1;
            return false;
        }

        let discovered_at = inner.next_discovered_at;
        inner.next_discovered_at += 1;

        let item = QueueItem {
            url,
            normalized_url: normalized.clone(),
            depth,
            parent_url,
            discovered_at,
        };

        let insert_at = inner
            .queue
            .iter()
            .position(|existing| {
                existing.depth > depth
                    || (existing.depth == depth && existing.discovered_at > discovered_at)
            })
            .unwrap_or(inner.queue.len());
        inner.queue.insert(insert_at, item);
        inner.queued_urls.insert(normalized);
        inner.total_pages_discovered += 1;
        true
    }

    /// Dequeue the head of the priority queue, marking it visited and
    /// processing atomically. Returns `None` when the queue is empty, the
    /// in-flight cap is reached, or `max_pages` would be exceeded.
    pub fn dequeue_url(&self) -> Option<QueueItem> {
        let mut inner = self.inner.lock().unwrap();

        if inner.queue.is_empty() {
            return None;
        }
        if inner.processing.len() as u32 >= self.config.max_threads {
            return None;
        }
        if (inner.results.len() + inner.processing.len()) as u32 >= self.config.max_pages {
            return None;
        }

        let item = inner.queue.remove(0);
        inner.queued_urls.remove(&item.normalized_url);
        inner.visited.insert(item.normalized_url.clone());
        inner.processing.insert(item.normalized_url.clone());
        Some(item)
    }

    /// Remove `normalized` from `processing` and record its result.
    pub fn complete_url(&self, normalized: &str, mut result: PageResult) {
        let mut inner = self.inner.lock().unwrap();
        inner.processing.remove(normalized);
        result.normalized_url = normalized.to_string();
        inner.results.push(result);
    }

    pub fn add_error(&self, err: String) {
        self.inner.lock().unwrap().errors.push(err);
    }

    /// Idempotent stop signal.
    pub fn stop(&self) {
        self.inner.lock().unwrap().stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.lock().unwrap().stopped
    }

    /// `!stopped && (queue-non-empty || processing-non-empty) && results < max_pages`.
    pub fn should_continue(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        !inner.stopped
            && (!inner.queue.is_empty() || !inner.processing.is_empty())
            && (inner.results.len() as u32) < self.config.max_pages
    }

    /// `!stopped && queue-non-empty && processing < max_threads`.
    pub fn has_urls_to_process(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        !inner.stopped && !inner.queue.is_empty() && (inner.processing.len() as u32) < self.config.max_threads
    }

    pub fn processing_count(&self) -> usize {
        self.inner.lock().unwrap().processing.len()
    }

    pub fn results(&self) -> Vec<PageResult> {
        self.inner.lock().unwrap().results.clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.inner.lock().unwrap().errors.clone()
    }

    /// Derive crawl-level statistics from the accumulated results.
    pub fn get_stats(&self, seed: &str) -> CrawlMetadata {
        let inner = self.inner.lock().unwrap();

        let successful_pages = inner
            .results
            .iter()
            .filter(|r| r.status == PageStatus::Completed)
            .count() as u64;
        let failed_pages = inner
            .results
            .iter()
            .filter(|r| r.status == PageStatus::Failed)
            .count() as u64;
        let max_depth_reached = inner.results.iter().map(|r| r.depth).max().unwrap_or(0);

        let completed_with_duration: Vec<i64> = inner
            .results
            .iter()
            .filter(|r| r.status == PageStatus::Completed)
            .filter_map(|r| r.duration_ms)
            .collect();
        let average_page_time_ms = if completed_with_duration.is_empty() {
            0.0
        } else {
            completed_with_duration.iter().sum::<i64>() as f64 / completed_with_duration.len() as f64
        };

        CrawlMetadata {
            start_url: seed.to_string(),
            max_depth_reached,
            total_pages_discovered: inner.total_pages_discovered,
            pages_skipped: inner.pages_skipped,
            crawl_duration_ms: self.start_time.elapsed().as_millis() as i64,
            average_page_time_ms,
            successful_pages,
            failed_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domsentry_types::PageResult;

    fn config(max_depth: u32, max_pages: u32, max_threads: u32) -> CrawlConfig {
        CrawlConfig {
            max_depth,
            max_pages,
            max_threads,
            include_subdomains: false,
            exclude_patterns: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    #[test]
    fn enqueue_orders_by_depth_then_discovery() {
        let state = CrawlState::new(config(5, 100, 3));
        assert!(state.enqueue_url("https://a".into(), "https://a".into(), 1, None));
        assert!(state.enqueue_url("https://b".into(), "https://b".into(), 0, None));
        assert!(state.enqueue_url("https://c".into(), "https://c".into(), 1, None));

        let first = state.dequeue_url().unwrap();
        assert_eq!(first.normalized_url, "https://b");
        let second = state.dequeue_url().unwrap();
        assert_eq!(second.normalized_url, "https://a");
        let third = state.dequeue_url().unwrap();
        assert_eq!(third.normalized_url, "https://c");
    }

    #[test]
    fn enqueue_rejects_duplicates_and_over_depth() {
        let state = CrawlState::new(config(1, 100, 3));
        assert!(state.enqueue_url("https://a".into(), "https://a".into(), 0, None));
        assert!(!state.enqueue_url("https://a".into(), "https://a".into(), 0, None));
        assert!(!state.enqueue_url("https://b".into(), "https://b".into(), 2, None));
    }

    #[test]
    fn dequeue_respects_max_threads() {
        let state = CrawlState::new(config(5, 100, 1));
        state.enqueue_url("https://a".into(), "https://a".into(), 0, None);
        state.enqueue_url("https://b".into(), "https://b".into(), 0, None);

        assert!(state.dequeue_url().is_some());
        assert!(state.dequeue_url().is_none());
    }

    #[test]
    fn complete_url_moves_out_of_processing() {
        let state = CrawlState::new(config(5, 100, 3));
        state.enqueue_url("https://a".into(), "https://a".into(), 0, None);
        let item = state.dequeue_url().unwrap();
        assert_eq!(state.processing_count(), 1);

        let result = PageResult::pending(item.url.clone(), item.normalized_url.clone(), 0);
        state.complete_url(&item.normalized_url, result);
        assert_eq!(state.processing_count(), 0);
        assert_eq!(state.results().len(), 1);
    }

    #[test]
    fn should_continue_false_once_stopped() {
        let state = CrawlState::new(config(5, 100, 3));
        state.enqueue_url("https://a".into(), "https://a".into(), 0, None);
        assert!(state.should_continue());
        state.stop();
        assert!(!state.should_continue());
    }
}
