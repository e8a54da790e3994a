//! Bounded-concurrency task controller.
//!
//! Grounded on `riptide-utils/src/circuit_breaker.rs`'s combination of a
//! `tokio::sync::Semaphore` with an atomic flag for short-circuiting, and
//! `riptide-utils/src/retry.rs`'s exponential-backoff retry loop (already
//! adapted into `domsentry-utils::RetryPolicy`, reused here for
//! `execute_task_with_retry`).

use domsentry_types::{AuditError, Result};
use domsentry_utils::RetryPolicy;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering::Relaxed};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// A FIFO-fair counting semaphore. Thin wrapper over
/// `tokio::sync::Semaphore`, which already serves waiters in submission
/// order; this type adds `waiting_count` observability on top.
pub struct BoundedSemaphore {
    inner: Semaphore,
    waiting: AtomicUsize,
}

impl BoundedSemaphore {
    pub fn new(permits: usize) -> Self {
        Self {
            inner: Semaphore::new(permits),
            waiting: AtomicUsize::new(0),
        }
    }

    pub fn available_permits(&self) -> usize {
        self.inner.available_permits()
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.load(Relaxed)
    }

    async fn acquire(&self) -> tokio::sync::SemaphorePermit<'_> {
        self.waiting.fetch_add(1, Relaxed);
        let permit = self
            .inner
            .acquire()
            .await
            .expect("semaphore is never closed");
        self.waiting.fetch_sub(1, Relaxed);
        permit
    }
}

/// Wraps a [`BoundedSemaphore`] with an idempotent stop flag, gating task
/// admission for the crawl engine's worker pool.
pub struct Controller {
    semaphore: BoundedSemaphore,
    stopped: AtomicBool,
}

impl Controller {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            semaphore: BoundedSemaphore::new(max_concurrency),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn waiting_count(&self) -> usize {
        self.semaphore.waiting_count()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Relaxed)
    }

    /// Idempotent. After this returns, subsequent `execute_task` calls
    /// fail immediately; a task already past its stopped-check runs to
    /// completion (there is no cancellation channel).
    pub fn stop(&self) {
        self.stopped.store(true, Relaxed);
    }

    /// Run `f` under a permit, guaranteeing release on every exit path.
    /// `_id` is accepted for call-site traceability (logged by callers)
    /// and otherwise unused.
    pub async fn execute_task<F, Fut, T>(&self, _id: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.is_stopped() {
            return Err(AuditError::Stopped);
        }

        let permit = self.semaphore.acquire().await;

        if self.is_stopped() {
            drop(permit);
            return Err(AuditError::Stopped);
        }

        let result = f().await;
        drop(permit);
        result
    }

    /// Retries a failing task up to `max_retries` additional times with
    /// exponential backoff `base_delay * 2^attempt`, abandoning the
    /// retry loop the instant the controller is stopped.
    pub async fn execute_task_with_retry<F, Fut, T>(
        &self,
        id: &str,
        mut f: F,
        max_retries: u32,
        base_delay: Duration,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let policy = RetryPolicy {
            max_attempts: max_retries as usize + 1,
            initial_backoff_ms: base_delay.as_millis() as u64,
            max_backoff_ms: u64::MAX,
            backoff_multiplier: 2.0,
        };

        let mut attempt = 0u32;
        loop {
            if self.is_stopped() {
                return Err(AuditError::Stopped);
            }

            let outcome = self.execute_task(id, || f()).await;
            match outcome {
                Ok(value) => return Ok(value),
                Err(AuditError::Stopped) => return Err(AuditError::Stopped),
                Err(err) => {
                    if attempt >= max_retries {
                        return Err(err);
                    }
                    let delay = policy.backoff_duration(attempt as usize);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(3)
    }
}

pub type SharedController = Arc<Controller>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn stopped_controller_rejects_new_tasks() {
        let ctrl = Controller::new(1);
        ctrl.stop();
        let result = ctrl.execute_task("t", || async { Ok(1) }).await;
        assert!(matches!(result, Err(AuditError::Stopped)));
    }

    #[tokio::test]
    async fn execute_task_releases_permit_on_failure() {
        let ctrl = Controller::new(1);
        let _ = ctrl
            .execute_task("t", || async {
                Err::<(), _>(AuditError::Stopped)
            })
            .await;
        assert_eq!(ctrl.available_permits(), 1);
    }

    #[tokio::test]
    async fn retry_stops_immediately_when_controller_stopped() {
        let ctrl = Controller::new(1);
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        ctrl.stop();

        let result = ctrl
            .execute_task_with_retry(
                "t",
                move || {
                    let attempts = attempts_clone.clone();
                    async move {
                        attempts.fetch_add(1, Ordering::Relaxed);
                        Err::<(), _>(AuditError::Stopped)
                    }
                },
                5,
                Duration::from_millis(1),
            )
            .await;

        assert!(matches!(result, Err(AuditError::Stopped)));
        assert_eq!(attempts.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn retry_gives_up_after_max_retries() {
        let ctrl = Controller::new(1);
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result: Result<()> = ctrl
            .execute_task_with_retry(
                "t",
                move || {
                    let attempts = attempts_clone.clone();
                    async move {
                        attempts.fetch_add(1, Ordering::Relaxed);
                        Err(AuditError::PageUnresponsive("boom".into()))
                    }
                },
                2,
                Duration::from_millis(1),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::Relaxed), 3);
    }
}
