//! Chart-ready data so callers can render a detection run without refitting.

use crate::breaks::segment::{GlobalFit, Segment};
use crate::core::TimePoint;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fitted line and observations of one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentLine {
    pub slope_per_year: f64,
    pub fitted: Vec<TimePoint>,
    pub observed: Vec<TimePoint>,
}

/// Everything needed to draw a break analysis chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    pub title: String,
    pub value_column: String,
    /// Focus-window observations.
    pub observed: Vec<TimePoint>,
    /// Global line evaluated at every observed date.
    pub global_line: Vec<TimePoint>,
    pub global_slope_per_year: Option<f64>,
    pub segment_lines: Vec<SegmentLine>,
    pub break_dates: Vec<NaiveDate>,
    pub transition_date: NaiveDate,
    /// Cut dates other than the transition that fall inside the observed range.
    pub secondary_markers: Vec<NaiveDate>,
    pub focus_start: NaiveDate,
    pub focus_end: NaiveDate,
}

/// Inputs for [`PlotData::build`].
pub(crate) struct PlotInputs<'a> {
    pub hypothesis_label: &'a str,
    pub value_column: &'a str,
    pub points: &'a [TimePoint],
    pub global_fit: Option<&'a GlobalFit>,
    pub segments: &'a [Segment],
    pub break_dates: &'a [NaiveDate],
    pub transition_date: NaiveDate,
    pub cut_dates: &'a [NaiveDate],
    pub focus_start: NaiveDate,
    pub focus_end: NaiveDate,
}

impl PlotData {
    pub(crate) fn build(inputs: PlotInputs<'_>) -> Self {
        let PlotInputs {
            hypothesis_label,
            value_column,
            points,
            global_fit,
            segments,
            break_dates,
            transition_date,
            cut_dates,
            focus_start,
            focus_end,
        } = inputs;

        let global_line = global_fit
            .map(|g| g.fitted_points(points))
            .unwrap_or_default();

        let segment_lines = segments
            .iter()
            .map(|seg| SegmentLine {
                slope_per_year: seg.slope_per_year,
                fitted: seg.fitted_points(points),
                observed: seg.slice(points).to_vec(),
            })
            .collect();

        let secondary_markers = match (points.first(), points.last()) {
            (Some(first), Some(last)) => cut_dates
                .iter()
                .copied()
                .filter(|&d| d != transition_date && first.date <= d && d <= last.date)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            title: format!(
                "Break Analysis: {}\nFocus: {} to {}",
                hypothesis_label, focus_start, focus_end
            ),
            value_column: value_column.to_string(),
            observed: points.to_vec(),
            global_line,
            global_slope_per_year: global_fit.map(|g| g.slope_per_year),
            segment_lines,
            break_dates: break_dates.to_vec(),
            transition_date,
            secondary_markers,
            focus_start,
            focus_end,
        }
    }
}
