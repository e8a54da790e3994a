//! Console-error detector: captures console and uncaught page-error
//! messages via listeners installed before navigation, then reports
//! the retained ones as issues.

use crate::common::contains_any;
use crate::scripts::console_error::DEFAULT_IGNORE_PATTERNS;
use async_trait::async_trait;
use domsentry_driver::{ConsoleHandler, ConsoleLevel, ConsoleMessage, PageErrorHandler, PageHandle};
use domsentry_types::{Issue, IssueKind, Result, Severity};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ConsoleErrorConfig {
    pub max_messages: usize,
    pub include_warnings: bool,
    pub ignore_patterns: Vec<String>,
}

impl Default for ConsoleErrorConfig {
    fn default() -> Self {
        Self {
            max_messages: 50,
            include_warnings: true,
            ignore_patterns: DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Collects console/page-error messages via the shared buffer its
/// handlers write into, then drains and grades them on `detect()`.
pub struct ConsoleErrorDetector {
    config: ConsoleErrorConfig,
    buffer: Arc<Mutex<Vec<ConsoleMessage>>>,
}

impl ConsoleErrorDetector {
    pub fn new(config: ConsoleErrorConfig) -> Self {
        Self {
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A console listener that appends into this detector's shared
    /// buffer, capped at `max_messages`. Hand this to
    /// [`domsentry_crawl::PageProcessor::console_handler`].
    pub fn console_handler(&self) -> ConsoleHandler {
        let buffer = self.buffer.clone();
        let cap = self.config.max_messages;
        Arc::new(move |msg: ConsoleMessage| {
            if matches!(msg.level, ConsoleLevel::Log) {
                return;
            }
            let mut guard = buffer.lock().expect("console buffer poisoned");
            if guard.len() < cap {
                guard.push(msg);
            }
        })
    }

    /// A page-error listener appending an `Error`-level message.
    pub fn page_error_handler(&self) -> PageErrorHandler {
        let buffer = self.buffer.clone();
        let cap = self.config.max_messages;
        Arc::new(move |text: String| {
            let mut guard = buffer.lock().expect("console buffer poisoned");
            if guard.len() < cap {
                guard.push(ConsoleMessage {
                    level: ConsoleLevel::Error,
                    text,
                    source: None,
                });
            }
        })
    }

    fn is_ignored(&self, msg: &ConsoleMessage) -> bool {
        let patterns: Vec<&str> = self.config.ignore_patterns.iter().map(String::as_str).collect();
        contains_any(&msg.text, &patterns) || msg.source.as_deref().map(|s| contains_any(s, &patterns)).unwrap_or(false)
    }

    fn severity_for(msg: &ConsoleMessage) -> Severity {
        let lower = msg.text.to_ascii_lowercase();
        match msg.level {
            ConsoleLevel::Error => {
                if lower.contains("syntaxerror")
                    || lower.contains("typeerror")
                    || lower.contains("referenceerror")
                    || lower.contains("uncaught")
                {
                    Severity::Critical
                } else {
                    Severity::Major
                }
            }
            ConsoleLevel::Warning => {
                if lower.contains("deprecated") || lower.contains("security") || lower.contains("unsafe") {
                    Severity::Major
                } else {
                    Severity::Minor
                }
            }
            ConsoleLevel::Log => Severity::Minor,
        }
    }
}

#[async_trait]
impl crate::common::Detector for ConsoleErrorDetector {
    fn name(&self) -> &'static str {
        "console-error"
    }

    async fn detect(&self, _page: &dyn PageHandle) -> Result<Vec<Issue>> {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let messages = {
            let guard = self.buffer.lock().expect("console buffer poisoned");
            guard.clone()
        };

        let mut retained: Vec<ConsoleMessage> = messages
            .into_iter()
            .filter(|m| match m.level {
                ConsoleLevel::Error => true,
                ConsoleLevel::Warning => self.config.include_warnings,
                ConsoleLevel::Log => false,
            })
            .filter(|m| !self.is_ignored(m))
            .collect();

        retained.truncate(self.config.max_messages);

        let mut graded: Vec<(Severity, ConsoleMessage)> =
            retained.into_iter().map(|m| (Self::severity_for(&m), m)).collect();
        graded.sort_by_key(|(sev, _)| *sev);

        Ok(graded
            .into_iter()
            .map(|(severity, msg)| {
                let mut message = msg.text.clone();
                if let Some(source) = &msg.source {
                    message = format!("{message} (at {source})");
                }
                Issue::new(IssueKind::ConsoleError, severity, message, vec![])
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(level: ConsoleLevel, text: &str) -> ConsoleMessage {
        ConsoleMessage {
            level,
            text: text.to_string(),
            source: None,
        }
    }

    #[test]
    fn ignored_patterns_are_filtered() {
        let d = ConsoleErrorDetector::new(ConsoleErrorConfig::default());
        assert!(d.is_ignored(&msg(ConsoleLevel::Error, "GET favicon.ico 404")));
        assert!(!d.is_ignored(&msg(ConsoleLevel::Error, "Uncaught TypeError: x is not a function")));
    }

    #[test]
    fn severity_rules_match_keywords() {
        assert_eq!(
            ConsoleErrorDetector::severity_for(&msg(ConsoleLevel::Error, "Uncaught ReferenceError: x is not defined")),
            Severity::Critical
        );
        assert_eq!(
            ConsoleErrorDetector::severity_for(&msg(ConsoleLevel::Error, "Failed to load resource: 404")),
            Severity::Major
        );
        assert_eq!(
            ConsoleErrorDetector::severity_for(&msg(ConsoleLevel::Warning, "this API is deprecated")),
            Severity::Major
        );
        assert_eq!(
            ConsoleErrorDetector::severity_for(&msg(ConsoleLevel::Warning, "non-passive event listener")),
            Severity::Minor
        );
    }

    #[tokio::test]
    async fn handlers_feed_the_shared_buffer() {
        let d = ConsoleErrorDetector::new(ConsoleErrorConfig {
            max_messages: 2,
            include_warnings: true,
            ignore_patterns: vec![],
        });
        let console_handler = d.console_handler();
        console_handler(msg(ConsoleLevel::Error, "boom one"));
        console_handler(msg(ConsoleLevel::Error, "boom two"));
        console_handler(msg(ConsoleLevel::Error, "boom three dropped by cap"));
        let guard = d.buffer.lock().unwrap();
        assert_eq!(guard.len(), 2);
    }
}
