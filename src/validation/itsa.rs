//! Interrupted time series analysis (ITSA) around a transition date.
//!
//! Fits `value ~ 1 + time + post_transition + time_after_transition` and
//! scores discontinuity by the significance of the slope change term.

use crate::core::TimePoint;
use crate::error::{BreakError, Result};
use crate::utils::ols::ols_fit;
use chrono::NaiveDate;
use std::collections::HashMap;

const TIME: &str = "time";
const POST_TRANSITION: &str = "post_transition";
const TIME_AFTER_TRANSITION: &str = "time_after_transition";

/// Minimum number of points: four parameters plus one residual degree of freedom.
pub const MIN_ITSA_POINTS: usize = 5;

/// Result of an interrupted time series fit.
#[derive(Debug, Clone, PartialEq)]
pub struct ItsaResult {
    /// `1 - p`: near 1 for an abrupt slope change, near 0 for a smooth one.
    pub score: f64,
    /// Two-sided p-value of the slope change coefficient.
    pub p_value: f64,
    /// Daily slope before the transition.
    pub pre_slope: Option<f64>,
    /// Change in level at the transition.
    pub level_change: Option<f64>,
    /// Change in daily slope after the transition.
    pub slope_change: Option<f64>,
}

/// Fit the segmented ITSA regression.
///
/// When no point lies strictly after the transition, or none on or before
/// it, the slope change cannot be estimated and the series counts as smooth
/// (`p_value = 1`, `score = 0`).
pub fn interrupted_time_series(points: &[TimePoint], transition: NaiveDate) -> Result<ItsaResult> {
    if points.len() < MIN_ITSA_POINTS {
        return Err(BreakError::InsufficientData {
            needed: MIN_ITSA_POINTS,
            got: points.len(),
        });
    }

    let post: Vec<f64> = points
        .iter()
        .map(|p| if p.date > transition { 1.0 } else { 0.0 })
        .collect();
    let n_post = post.iter().filter(|&&v| v > 0.0).count();
    if n_post == 0 || n_post == points.len() {
        return Ok(ItsaResult {
            score: 0.0,
            p_value: 1.0,
            pre_slope: None,
            level_change: None,
            slope_change: None,
        });
    }

    let Some(first) = points.iter().map(|p| p.date).min() else {
        return Err(BreakError::InsufficientData {
            needed: MIN_ITSA_POINTS,
            got: 0,
        });
    };

    let time: Vec<f64> = points
        .iter()
        .map(|p| (p.date - first).num_days() as f64)
        .collect();
    let time_after: Vec<f64> = points
        .iter()
        .map(|p| ((p.date - transition).num_days() as f64).max(0.0))
        .collect();
    let y: Vec<f64> = points.iter().map(|p| p.value).collect();

    let mut regressors = HashMap::new();
    regressors.insert(TIME.to_string(), time);
    regressors.insert(POST_TRANSITION.to_string(), post);
    regressors.insert(TIME_AFTER_TRANSITION.to_string(), time_after);

    let fit = ols_fit(&y, &regressors)?;
    let p_value = fit.p_value(TIME_AFTER_TRANSITION).unwrap_or(1.0);

    Ok(ItsaResult {
        score: 1.0 - p_value,
        p_value,
        pre_slope: fit.coefficient(TIME),
        level_change: fit.coefficient(POST_TRANSITION),
        slope_change: fit.coefficient(TIME_AFTER_TRANSITION),
    })
}

/// Discontinuity score in `[0, 1]`; lower means a smoother transition.
pub fn smoothness_score(points: &[TimePoint], transition: NaiveDate) -> Result<f64> {
    interrupted_time_series(points, transition).map(|r| r.score)
}
