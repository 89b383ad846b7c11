//! Structural break detection around a known transition date.
//!
//! [`BreakDetector`] is the entry point. It splits the focus window at
//! forced or automatically detected breaks, fits an OLS line per segment and
//! one over the whole window, and reports Chow tests, a break score and each
//! break's alignment with the transition.

pub mod detector;
pub mod plot;
pub mod result;
pub mod score;
pub mod segment;

pub use detector::{BreakDetector, BreakDetectorConfig, DEFAULT_TRANSITION_DATE, NO_RANGE};
pub use plot::{PlotData, SegmentLine};
pub use result::{BreakPoint, DetectionResult, LocalChowResult};
pub use score::{
    alignment_score, break_score, transition_alignment, ALIGNMENT_WINDOW_DAYS, VARIANCE_EPSILON,
};
pub use segment::{fit_global, fit_segment, GlobalFit, Segment, Trend, DAYS_PER_YEAR};
