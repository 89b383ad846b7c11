//! Changepoint selection for structural break analysis.
//!
//! Break indices come from one of two mutually exclusive modes:
//!
//! - **Forced**: cut at known calendar dates (e.g. a coding-scheme transition
//!   and a checkpoint one year later), whatever the data shows.
//! - **Automatic**: cut after relative jumps larger than `mean + 3σ`, limited
//!   to a maximum count by a transition-first prioritization.
//!
//! # Example
//!
//! ```
//! use structural_breaks::changepoint::find_jump_breaks;
//!
//! let mut series = vec![10.0; 30];
//! series.extend(vec![20.0; 30]);
//!
//! assert_eq!(find_jump_breaks(&series), vec![30]);
//! ```

pub mod selector;

pub use selector::{
    find_jump_breaks, forced_break_indices, prioritize_breaks, relative_changes,
    ChangepointSelector, SegmentationMode, JUMP_THRESHOLD_SIGMAS, MAX_POINTS_WITHOUT_SIGNAL,
    MIN_BREAK_SPACING_DAYS, RELATIVE_CHANGE_EPSILON,
};
