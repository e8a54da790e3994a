//! Domsentry Utils - shared utilities for the domsentry workspace
//!
//! This crate provides small, dependency-light helpers used across the
//! crawl engine, detectors, and CLI:
//!
//! - **Retry**: retry policies with exponential backoff
//! - **Time**: timestamp conversions and RFC3339 formatting

#![warn(clippy::all)]

pub mod retry;
pub mod time;

pub use retry::RetryPolicy;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _ = RetryPolicy::default();
    }
}
