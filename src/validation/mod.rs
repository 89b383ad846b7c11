//! Statistical tests for structural breaks.
//!
//! Provides Chow F-tests (global multi-segment and local single-break) and an
//! interrupted time series score around a transition date.
//!
//! # Example
//!
//! ```
//! use structural_breaks::validation::chow_test_multi;
//!
//! // One line leaves SSR 100, two segment lines leave SSR 20 over 20 points
//! let stat = chow_test_multi(20, 2, 2, 100.0, 20.0).unwrap();
//! assert!((stat.f - 32.0).abs() < 1e-9);
//! assert!(stat.is_significant(0.05));
//! ```

pub mod chow;
pub mod itsa;

pub use chow::{chow_test_multi, local_chow_test, ChowStatistic, PARAMS_PER_REGRESSION};
pub use itsa::{interrupted_time_series, smoothness_score, ItsaResult, MIN_ITSA_POINTS};
