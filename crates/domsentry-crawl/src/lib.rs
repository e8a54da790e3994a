//! Bounded-concurrency, breadth-first crawl engine.
//!
//! Owns URL normalization, link extraction, the priority queue/state
//! manager, page preparation, and the BFS scheduling loop. Detector
//! semantics live in a sibling crate and are supplied to the engine
//! through the [`engine::PageProcessor`] trait, so this crate has no
//! knowledge of what a "detector" actually checks.

pub mod controller;
pub mod engine;
pub mod links;
pub mod normalize;
pub mod preparer;
pub mod state;

pub use controller::{BoundedSemaphore, Controller, SharedController};
pub use engine::{CrawlEngine, PageProcessor};
pub use links::{extract_links, ExtractedLink, LinkExtractorConfig};
pub use normalize::{is_internal, is_navigational, normalize};
pub use preparer::prepare_page;
pub use state::CrawlState;
