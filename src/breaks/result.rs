//! Detection output records.

use crate::breaks::plot::PlotData;
use crate::breaks::segment::{GlobalFit, Segment};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Interior break: `0 < index < len(series)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPoint {
    pub index: usize,
    pub date: NaiveDate,
}

/// Two-segment Chow test straddling one break.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalChowResult {
    pub break_index: usize,
    pub break_date: NaiveDate,
    /// `+inf` when both sides are fitted exactly.
    #[serde(with = "crate::utils::float_serde")]
    pub f: f64,
    pub p_value: f64,
}

/// Outcome of one detection run.
///
/// Statistics that could not be computed are `None`; an empty focus window
/// yields a result with no breaks, no segments and a zero score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub break_points: Vec<usize>,
    pub break_dates: Vec<NaiveDate>,
    pub segments: Vec<Segment>,
    pub total_breaks: usize,
    pub break_score: f64,
    pub value_column: String,
    /// Alignment with the transition date, one per break.
    pub transition_alignment: Vec<f64>,
    /// `"YYYY-MM-DD to YYYY-MM-DD"`, or `"n/a"` for empty input.
    pub focus_range: String,
    pub global_fit: Option<GlobalFit>,
    pub global_ssr: Option<f64>,
    pub segments_ssr: Option<f64>,
    /// Non-finite values serialize as `"inf"`, keeping `null` for "not computed".
    #[serde(with = "crate::utils::float_serde::option")]
    pub global_chow_f: Option<f64>,
    pub global_chow_p: Option<f64>,
    pub local_chow: Vec<LocalChowResult>,
    /// Chart-ready intermediate data, when requested.
    pub plot: Option<PlotData>,
}

impl DetectionResult {
    /// Result for a series with nothing to analyse.
    pub fn empty(value_column: impl Into<String>, focus_range: impl Into<String>) -> Self {
        Self {
            break_points: Vec::new(),
            break_dates: Vec::new(),
            segments: Vec::new(),
            total_breaks: 0,
            break_score: 0.0,
            value_column: value_column.into(),
            transition_alignment: Vec::new(),
            focus_range: focus_range.into(),
            global_fit: None,
            global_ssr: None,
            segments_ssr: None,
            global_chow_f: None,
            global_chow_p: None,
            local_chow: Vec::new(),
            plot: None,
        }
    }

    /// Breaks paired with their dates.
    pub fn breaks(&self) -> Vec<BreakPoint> {
        self.break_points
            .iter()
            .zip(self.break_dates.iter())
            .map(|(&index, &date)| BreakPoint { index, date })
            .collect()
    }

    /// Reduction in SSR from splitting the single line into segments.
    pub fn ssr_reduction(&self) -> Option<f64> {
        Some(self.global_ssr? - self.segments_ssr?)
    }

    /// Local Chow result of a break date, if it was computable.
    pub fn local_chow_for(&self, date: NaiveDate) -> Option<&LocalChowResult> {
        self.local_chow.iter().find(|lc| lc.break_date == date)
    }
}
