//! Break score and transition alignment.

use crate::breaks::segment::Segment;
use crate::core::date_ordinal;
use crate::utils::stats::population_variance;
use chrono::NaiveDate;

/// Guard added to the date variance denominator.
pub const VARIANCE_EPSILON: f64 = 1e-10;

/// Distance in days at which alignment with the transition falls to zero.
pub const ALIGNMENT_WINDOW_DAYS: f64 = 180.0;

/// Length-weighted mean of segment value variances, normalized by the
/// variance of the date ordinals. Lower is better.
///
/// A segmentation with at most one segment scores exactly 0.0.
pub fn break_score(segments: &[Segment], all_dates: &[NaiveDate]) -> f64 {
    if segments.len() <= 1 {
        return 0.0;
    }

    let (weighted, total_length) = segments.iter().fold((0.0, 0usize), |(w, n), seg| {
        (w + seg.std_value.powi(2) * seg.length as f64, n + seg.length)
    });
    if total_length == 0 {
        return f64::INFINITY;
    }

    let ordinals: Vec<f64> = all_dates.iter().map(|&d| date_ordinal(d)).collect();
    let date_variance = population_variance(&ordinals);
    (weighted / total_length as f64) / (date_variance + VARIANCE_EPSILON)
}

/// Closeness of a date to the transition: 1.0 on the day, falling linearly
/// to 0.0 at 180 days either side.
pub fn alignment_score(date: NaiveDate, transition: NaiveDate) -> f64 {
    let days = (date - transition).num_days().abs() as f64;
    (1.0 - days / ALIGNMENT_WINDOW_DAYS).max(0.0)
}

/// Alignment score of each break date.
pub fn transition_alignment(break_dates: &[NaiveDate], transition: NaiveDate) -> Vec<f64> {
    break_dates
        .iter()
        .map(|&d| alignment_score(d, transition))
        .collect()
}
