//! # structural-breaks
//!
//! Detects artificial structural discontinuities in a time series around a
//! known external event, such as a coding-scheme transition.
//!
//! The series is split at forced calendar cuts or at automatically detected
//! relative jumps, an OLS trend is fitted per segment and over the whole
//! window, and classical Chow F-tests (global and per break) quantify how
//! poorly a single trend explains the data.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod breaks;
pub mod changepoint;
pub mod core;
pub mod error;
pub mod utils;
pub mod validation;

pub use error::{BreakError, Result};

pub mod prelude {
    pub use crate::breaks::{BreakDetector, BreakDetectorConfig, DetectionResult, Segment};
    pub use crate::changepoint::SegmentationMode;
    pub use crate::core::{FocusWindow, SeriesFrame, SeriesFrameBuilder, TimePoint};
    pub use crate::error::{BreakError, Result};
}
