//! Statistical utility functions.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (n denominator, ddof = 0).
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof = 0).
pub fn population_std(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Upper tail probability `1 - CDF` of the F distribution.
///
/// Returns `None` when the degrees of freedom are not positive.
pub fn f_survival(f: f64, df1: f64, df2: f64) -> Option<f64> {
    if f.is_nan() {
        return None;
    }
    if f == f64::INFINITY {
        return Some(0.0);
    }
    let dist = FisherSnedecor::new(df1, df2).ok()?;
    Some((1.0 - dist.cdf(f)).clamp(0.0, 1.0))
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom.
pub fn students_t_two_sided_p(t: f64, df: f64) -> Option<f64> {
    if t.is_nan() {
        return None;
    }
    if t.is_infinite() {
        return Some(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}
