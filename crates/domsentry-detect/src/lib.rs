//! Geometry-based visual defect detectors and the analyzer that runs
//! them.

pub mod analyzer;
pub mod centering;
pub mod common;
pub mod console_error;
pub mod container_overflow;
pub mod flex_grid;
pub mod overlap;
pub mod padding;
pub mod processor;
pub mod scripts;
pub mod scrollbar;
pub mod spacing;

pub use analyzer::Analyzer;
pub use centering::{CenteringConfig, CenteringDetector};
pub use common::Detector;
pub use console_error::{ConsoleErrorConfig, ConsoleErrorDetector};
pub use container_overflow::{ContainerOverflowConfig, ContainerOverflowDetector};
pub use flex_grid::{FlexGridConfig, FlexGridDetector};
pub use overlap::{OverlapConfig, OverlapDetector};
pub use padding::{PaddingConfig, PaddingDetector};
pub use processor::DetectorPageProcessor;
pub use scrollbar::{ScrollbarConfig, ScrollbarDetector};
pub use spacing::{SpacingConfig, SpacingDetector};
