//! Headless browser driver abstraction.
//!
//! Exposes [`BrowserDriver`]/[`PageHandle`] as the only contract the
//! rest of the workspace depends on. The concrete implementation in
//! [`cdp`] is the sole module aware of the underlying CDP engine crate.

pub mod cdp;
pub mod error;
pub mod traits;

pub use cdp::{CdpBrowser, CdpPage};
pub use error::{DriverError, Result};
pub use traits::{
    BrowserDriver, ConsoleHandler, ConsoleLevel, ConsoleMessage, NavigateOutcome, PageErrorHandler,
    PageHandle,
};
