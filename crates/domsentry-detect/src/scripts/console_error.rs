//! The console-error detector has no driver-evaluated script of its
//! own — it consumes the console/page-error listeners every
//! [`domsentry_driver::PageHandle`] already exposes. This module just
//! holds the default ignore-pattern list as shared data.

pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "favicon.ico",
    "robots.txt",
    "sw.js",
    "service-worker",
    "chrome-extension://",
    "moz-extension://",
    "webpack",
    "hot-reload",
    "livereload",
    "googletagmanager",
    "google-analytics",
    "gtag",
    "facebook.net",
    "doubleclick.net",
];
