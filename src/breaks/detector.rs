//! Break detection entry point.
//!
//! A run prepares the series (value column, sort), filters it to the focus
//! window, selects break indices, fits one line per segment plus a global
//! line, runs global and per-break Chow tests and scores the segmentation.

use crate::breaks::plot::{PlotData, PlotInputs};
use crate::breaks::result::{DetectionResult, LocalChowResult};
use crate::breaks::score::{break_score, transition_alignment};
use crate::breaks::segment::{fit_global, fit_segment, Segment};
use crate::changepoint::{ChangepointSelector, SegmentationMode};
use crate::core::{filter_to_window, FocusWindow, SeriesFrame, TimePoint};
use crate::error::{BreakError, Result};
use crate::validation::{chow_test_multi, local_chow_test, PARAMS_PER_REGRESSION};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Focus range label for a series with no data at all.
pub const NO_RANGE: &str = "n/a";

/// ICD-9 to ICD-10 switch in US claims data.
pub const DEFAULT_TRANSITION_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2015, 10, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Configuration for [`BreakDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakDetectorConfig {
    /// Reference event date (e.g. the ICD-9 to ICD-10 switch).
    pub transition_date: NaiveDate,
    /// Analysis window; unset bounds follow the data.
    pub focus: FocusWindow,
    /// Forced cut dates or automatic jump detection.
    pub mode: SegmentationMode,
    /// Cut dates for forced mode. Unset means the transition date and the
    /// date twelve months later.
    pub forced_cut_dates: Option<Vec<NaiveDate>>,
    /// Upper bound on automatically detected breaks.
    pub max_breaks: usize,
}

impl Default for BreakDetectorConfig {
    fn default() -> Self {
        Self {
            transition_date: DEFAULT_TRANSITION_DATE,
            focus: FocusWindow::full(),
            mode: SegmentationMode::Forced,
            forced_cut_dates: None,
            max_breaks: 2,
        }
    }
}

impl BreakDetectorConfig {
    /// Set the reference transition date.
    pub fn transition_date(mut self, date: NaiveDate) -> Self {
        self.transition_date = date;
        self
    }

    /// Set the first date of the focus window.
    pub fn focus_start(mut self, date: NaiveDate) -> Self {
        self.focus.start = Some(date);
        self
    }

    /// Set the last date of the focus window.
    pub fn focus_end(mut self, date: NaiveDate) -> Self {
        self.focus.end = Some(date);
        self
    }

    /// Set the whole focus window.
    pub fn focus(mut self, focus: FocusWindow) -> Self {
        self.focus = focus;
        self
    }

    /// Set the segmentation mode.
    pub fn mode(mut self, mode: SegmentationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Use automatic jump detection.
    pub fn automatic(self) -> Self {
        self.mode(SegmentationMode::Automatic)
    }

    /// Override the forced cut dates.
    pub fn forced_cut_dates(mut self, dates: Vec<NaiveDate>) -> Self {
        self.forced_cut_dates = Some(dates);
        self
    }

    /// Set the maximum number of automatic breaks.
    pub fn max_breaks(mut self, max_breaks: usize) -> Self {
        self.max_breaks = max_breaks;
        self
    }

    /// Cut dates used in forced mode.
    pub fn cut_dates(&self) -> Vec<NaiveDate> {
        match &self.forced_cut_dates {
            Some(dates) => dates.clone(),
            None => {
                let mut dates = vec![self.transition_date];
                dates.extend(self.transition_date.checked_add_months(Months::new(12)));
                dates
            }
        }
    }

    /// Check the configuration for contradictions.
    pub fn validate(&self) -> Result<()> {
        self.focus.validate()
    }
}

/// Structural break detector.
///
/// Holds read-only configuration; each call works on its own copy of the
/// input, so one detector can serve concurrent callers.
///
/// # Example
///
/// ```
/// use chrono::{Months, NaiveDate};
/// use structural_breaks::breaks::{BreakDetector, BreakDetectorConfig};
/// use structural_breaks::core::SeriesFrame;
///
/// let start = NaiveDate::from_ymd_opt(2014, 10, 1).unwrap();
/// let dates: Vec<NaiveDate> = (0..24)
///     .map(|m| start.checked_add_months(Months::new(m)).unwrap())
///     .collect();
/// let values: Vec<f64> = (0..24).map(|m| if m < 12 { 10.0 } else { 20.0 }).collect();
/// let frame = SeriesFrame::univariate(dates, "rolling_count", values).unwrap();
///
/// let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();
/// let result = detector.detect_breaks(&frame, None, "level shift", false).unwrap();
///
/// assert_eq!(result.break_points, vec![12]);
/// assert_eq!(result.segments.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BreakDetector {
    config: BreakDetectorConfig,
    selector: ChangepointSelector,
}

impl BreakDetector {
    pub fn new(config: BreakDetectorConfig) -> Result<Self> {
        config.validate()?;
        let selector = ChangepointSelector {
            mode: config.mode,
            cut_dates: config.cut_dates(),
            transition_date: config.transition_date,
            max_breaks: config.max_breaks,
        };
        Ok(Self { config, selector })
    }

    pub fn config(&self) -> &BreakDetectorConfig {
        &self.config
    }

    /// Analyse one numeric column of a frame.
    ///
    /// # Arguments
    /// * `series` - Date column plus numeric and pass-through columns
    /// * `value_column` - Column to analyse; inferred when `None`
    /// * `hypothesis_label` - Name used in the plot title
    /// * `produce_plot_data` - Whether to attach [`PlotData`]
    ///
    /// # Errors
    /// Fails when no usable value column can be resolved or the column holds
    /// non-finite values. An empty focus window is not an error.
    pub fn detect_breaks(
        &self,
        series: &SeriesFrame,
        value_column: Option<&str>,
        hypothesis_label: &str,
        produce_plot_data: bool,
    ) -> Result<DetectionResult> {
        let value_column = series.resolve_value_column(value_column)?;
        let points = series.sorted_points(&value_column)?;
        Ok(self.analyze(&points, &value_column, hypothesis_label, produce_plot_data))
    }

    /// Analyse bare points, sorted internally by date.
    pub fn detect_points(
        &self,
        points: &[TimePoint],
        value_column: &str,
        hypothesis_label: &str,
        produce_plot_data: bool,
    ) -> Result<DetectionResult> {
        if points.iter().any(|p| !p.value.is_finite()) {
            return Err(BreakError::MissingValues(value_column.to_string()));
        }
        let mut sorted = points.to_vec();
        sorted.sort_by_key(|p| p.date);
        Ok(self.analyze(&sorted, value_column, hypothesis_label, produce_plot_data))
    }

    fn analyze(
        &self,
        points: &[TimePoint],
        value_column: &str,
        hypothesis_label: &str,
        produce_plot_data: bool,
    ) -> DetectionResult {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            log::warn!("no data available for '{}'", value_column);
            return DetectionResult::empty(value_column, NO_RANGE);
        };

        let (focus_start, focus_end) = self.config.focus.resolve(first.date, last.date);
        let focus_range = format!("{} to {}", focus_start, focus_end);
        let focused = filter_to_window(points, focus_start, focus_end);
        if focused.is_empty() {
            log::warn!("no data in focus range {}", focus_range);
            return DetectionResult::empty(value_column, focus_range);
        }

        let n = focused.len();
        log::debug!("analyzing {} points in focus {}", n, focus_range);

        let global_fit = fit_global(&focused);
        let global_ssr = global_fit.as_ref().map(|g| g.ssr(&focused));

        let break_points = self.selector.select(&focused);
        let segments = build_segments(&focused, &break_points);
        let segments_ssr: f64 = segments.iter().map(|seg| seg.ssr(&focused)).sum();

        let break_dates: Vec<NaiveDate> = break_points.iter().map(|&i| focused[i].date).collect();
        let dates: Vec<NaiveDate> = focused.iter().map(|p| p.date).collect();
        let score = break_score(&segments, &dates);

        let global_chow = global_ssr.and_then(|ssr_restricted| {
            chow_test_multi(
                n,
                PARAMS_PER_REGRESSION,
                segments.len().max(1),
                ssr_restricted,
                segments_ssr,
            )
        });

        let local_chow = break_points
            .iter()
            .filter_map(|&b| {
                local_chow_test(&focused, b, PARAMS_PER_REGRESSION).map(|stat| LocalChowResult {
                    break_index: b,
                    break_date: focused[b].date,
                    f: stat.f,
                    p_value: stat.p_value,
                })
            })
            .collect();

        let plot = produce_plot_data.then(|| {
            PlotData::build(PlotInputs {
                hypothesis_label,
                value_column,
                points: &focused,
                global_fit: global_fit.as_ref(),
                segments: &segments,
                break_dates: &break_dates,
                transition_date: self.config.transition_date,
                cut_dates: &self.selector.cut_dates,
                focus_start,
                focus_end,
            })
        });

        DetectionResult {
            total_breaks: break_points.len(),
            transition_alignment: transition_alignment(&break_dates, self.config.transition_date),
            break_points,
            break_dates,
            segments,
            break_score: score,
            value_column: value_column.to_string(),
            focus_range,
            global_fit,
            global_ssr,
            segments_ssr: Some(segments_ssr),
            global_chow_f: global_chow.map(|c| c.f),
            global_chow_p: global_chow.map(|c| c.p_value),
            local_chow,
            plot,
        }
    }
}

/// Fit consecutive ranges between `[0] + breaks + [n]`, skipping ranges with
/// fewer than two points.
fn build_segments(points: &[TimePoint], break_points: &[usize]) -> Vec<Segment> {
    let mut bounds = Vec::with_capacity(break_points.len() + 2);
    bounds.push(0);
    bounds.extend_from_slice(break_points);
    bounds.push(points.len());

    bounds
        .windows(2)
        .filter_map(|w| {
            let segment = fit_segment(points, w[0], w[1]);
            if segment.is_none() {
                log::debug!("skipping segment {}..{} with fewer than two points", w[0], w[1]);
            }
            segment
        })
        .collect()
}
