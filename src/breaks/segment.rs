//! Per-segment OLS fits of value on date ordinal.

use crate::core::{date_ordinal, TimePoint};
use crate::utils::ols::{fit_line, LinearFit};
use crate::utils::stats::{mean, population_std};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days per year used to annualize daily slopes.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Linear fit over the half-open index range `[start_index, end_index)` of a
/// date-sorted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_index: usize,
    pub end_index: usize,
    /// OLS slope per day scaled by 365.25.
    pub slope_per_year: f64,
    /// In-sample coefficient of determination.
    pub r_squared: f64,
    pub mean_value: f64,
    /// Population standard deviation (ddof = 0).
    pub std_value: f64,
    /// Number of points in the segment.
    pub length: usize,
    /// Fitted line, kept for re-prediction.
    pub fitted_model: LinearFit,
}

/// Fit over the whole focus window; the restricted model of the global Chow test.
pub type GlobalFit = Segment;

impl Segment {
    /// Predicted value at a date.
    pub fn predict(&self, date: NaiveDate) -> f64 {
        self.fitted_model.predict(date_ordinal(date))
    }

    /// Points of this segment within the series it was fitted on.
    pub fn slice<'a>(&self, points: &'a [TimePoint]) -> &'a [TimePoint] {
        &points[self.start_index.min(points.len())..self.end_index.min(points.len())]
    }

    /// Fitted values at each of this segment's dates.
    pub fn fitted_points(&self, points: &[TimePoint]) -> Vec<TimePoint> {
        self.slice(points)
            .iter()
            .map(|p| TimePoint::new(p.date, self.predict(p.date)))
            .collect()
    }

    /// Sum of squared residuals over this segment's own points.
    pub fn ssr(&self, points: &[TimePoint]) -> f64 {
        let seg = self.slice(points);
        let x: Vec<f64> = seg.iter().map(|p| p.ordinal()).collect();
        let y: Vec<f64> = seg.iter().map(|p| p.value).collect();
        self.fitted_model.ssr(&x, &y)
    }

    /// Whether the fitted trend rises, falls or stays flat.
    pub fn trend(&self) -> Trend {
        if self.slope_per_year > 0.0 {
            Trend::Incline
        } else if self.slope_per_year < 0.0 {
            Trend::Decline
        } else {
            Trend::Flat
        }
    }
}

/// Direction of a segment's slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Incline,
    Decline,
    Flat,
}

/// Fit `points[start_index..end_index]`.
///
/// Returns `None` when the range holds fewer than two points or lies outside
/// the series.
pub fn fit_segment(points: &[TimePoint], start_index: usize, end_index: usize) -> Option<Segment> {
    if end_index > points.len() || end_index < start_index + 2 {
        return None;
    }
    let seg = &points[start_index..end_index];

    let x: Vec<f64> = seg.iter().map(|p| p.ordinal()).collect();
    let y: Vec<f64> = seg.iter().map(|p| p.value).collect();
    let fitted_model = fit_line(&x, &y)?;

    Some(Segment {
        start_date: seg[0].date,
        end_date: seg[seg.len() - 1].date,
        start_index,
        end_index,
        slope_per_year: fitted_model.slope * DAYS_PER_YEAR,
        r_squared: fitted_model.r_squared(&x, &y),
        mean_value: mean(&y),
        std_value: population_std(&y),
        length: seg.len(),
        fitted_model,
    })
}

/// Fit a single line across the entire series.
pub fn fit_global(points: &[TimePoint]) -> Option<GlobalFit> {
    fit_segment(points, 0, points.len())
}
