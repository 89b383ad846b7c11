//! Regression and statistics helpers.

pub mod float_serde;
pub mod ols;
pub mod stats;

pub use ols::{fit_line, ols_fit, LinearFit, OLSResult};
pub use stats::{f_survival, mean, population_std, population_variance, students_t_two_sided_p};
