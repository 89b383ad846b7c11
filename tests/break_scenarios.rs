//! End-to-end detection scenarios.

use approx::assert_relative_eq;
use chrono::{Duration, Months, NaiveDate};
use structural_breaks::breaks::{
    fit_segment, BreakDetector, BreakDetectorConfig, DetectionResult,
};
use structural_breaks::core::{SeriesFrame, SeriesFrameBuilder, TimePoint};
use structural_breaks::BreakError;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn monthly_dates(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| start.checked_add_months(Months::new(i as u32)).unwrap())
        .collect()
}

fn daily_dates(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n).map(|i| start + Duration::days(i as i64)).collect()
}

/// Monthly "count" frame starting 2014-10-01, one year before the transition.
fn monthly_frame(n: usize, values: Vec<f64>) -> SeriesFrame {
    SeriesFrame::univariate(monthly_dates(ymd(2014, 10, 1), n), "count", values).unwrap()
}

fn wiggle(i: usize) -> f64 {
    ((i * 7) % 5) as f64 * 0.1 - 0.2
}

#[test]
fn level_shift_at_transition_is_one_break() {
    // 24 monthly points; month 12 is 2015-10-01 and month 24 (2016-10-01) is past the end
    let values: Vec<f64> = (0..24).map(|m| if m < 12 { 10.0 } else { 20.0 }).collect();
    let frame = monthly_frame(24, values);
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();

    let result = detector.detect_breaks(&frame, None, "level shift", false).unwrap();

    assert_eq!(result.total_breaks, 1);
    assert_eq!(result.break_points, vec![12]);
    assert_eq!(result.break_dates, vec![ymd(2015, 10, 1)]);
    assert_eq!(result.segments.len(), 2);
    for seg in &result.segments {
        assert!(seg.slope_per_year.abs() < 1e-9);
    }
    assert!(result.break_score < 1e-9);
    let f = result.global_chow_f.unwrap();
    assert!(f > 0.0 && f > 1e3);
    assert_eq!(result.focus_range, "2014-10-01 to 2016-09-01");
}

#[test]
fn noisy_level_shift_has_finite_large_chow() {
    let values: Vec<f64> = (0..24)
        .map(|m| if m < 12 { 10.0 } else { 20.0 } + wiggle(m))
        .collect();
    let frame = monthly_frame(24, values);
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();

    let result = detector.detect_breaks(&frame, None, "", false).unwrap();

    let f = result.global_chow_f.unwrap();
    assert!(f.is_finite());
    assert!(f > 100.0);
    assert!(result.global_chow_p.unwrap() < 1e-6);
    assert!(result.ssr_reduction().unwrap() > 0.0);

    let local = result.local_chow_for(ymd(2015, 10, 1)).unwrap();
    assert_eq!(local.break_index, 12);
    assert!(local.f > 100.0);
    assert!(local.p_value < 1e-6);
}

#[test]
fn linear_series_has_no_automatic_breaks() {
    let values: Vec<f64> = (0..120).map(|i| 1000.0 + i as f64).collect();
    let frame =
        SeriesFrame::univariate(daily_dates(ymd(2015, 6, 1), 120), "value", values).unwrap();
    let detector = BreakDetector::new(BreakDetectorConfig::default().automatic()).unwrap();

    let result = detector.detect_breaks(&frame, Some("value"), "", false).unwrap();

    assert!(result.break_points.is_empty());
    assert_eq!(result.segments.len(), 1);
    assert_eq!(result.break_score, 0.0);
    assert!(result.global_chow_f.is_none());
    assert!(result.local_chow.is_empty());
    let global = result.global_fit.unwrap();
    assert_relative_eq!(global.slope_per_year, 365.25, epsilon = 1e-6);
}

#[test]
fn automatic_mode_finds_jump_near_transition() {
    let dates = daily_dates(ymd(2015, 6, 1), 240);
    let transition_index = dates.iter().position(|&d| d == ymd(2015, 10, 1)).unwrap();
    let values: Vec<f64> = (0..240)
        .map(|i| if i < transition_index { 50.0 } else { 120.0 } + wiggle(i))
        .collect();
    let frame = SeriesFrame::univariate(dates, "rolling_count", values).unwrap();
    let detector = BreakDetector::new(BreakDetectorConfig::default().automatic()).unwrap();

    let result = detector.detect_breaks(&frame, None, "", false).unwrap();

    assert_eq!(result.break_points, vec![transition_index]);
    assert_eq!(result.transition_alignment, vec![1.0]);
    assert!(result.global_chow_p.unwrap() < 1e-6);
}

#[test]
fn empty_focus_window_is_a_valid_result() {
    let frame =
        SeriesFrame::univariate(daily_dates(ymd(2015, 1, 1), 30), "count", vec![1.0; 30]).unwrap();
    let config = BreakDetectorConfig::default().focus_start(ymd(2016, 1, 1));
    let detector = BreakDetector::new(config).unwrap();

    let result = detector.detect_breaks(&frame, None, "", true).unwrap();

    assert_eq!(result.total_breaks, 0);
    assert!(result.segments.is_empty());
    assert_eq!(result.break_score, 0.0);
    assert_eq!(result.focus_range, "2016-01-01 to 2015-01-30");
    assert!(result.global_fit.is_none());
    assert!(result.plot.is_none());
}

#[test]
fn missing_numeric_column_is_reported() {
    let frame = SeriesFrameBuilder::new()
        .dates(daily_dates(ymd(2015, 1, 1), 3))
        .text("code", vec!["I10".into(), "I10".into(), "I10".into()])
        .build()
        .unwrap();
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();

    let err = detector.detect_breaks(&frame, None, "", false).unwrap_err();
    assert_eq!(err, BreakError::NoNumericColumn);
    assert!(err.is_configuration());
}

#[test]
fn segments_refit_identically() {
    let values: Vec<f64> = (0..36)
        .map(|m| 5.0 + 0.3 * m as f64 + if m >= 12 { 4.0 } else { 0.0 } + wiggle(m))
        .collect();
    let frame = monthly_frame(36, values);
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();

    let result = detector.detect_breaks(&frame, None, "", true).unwrap();
    let observed = &result.plot.as_ref().unwrap().observed;

    assert_eq!(result.segments.len(), 3);
    for seg in &result.segments {
        let refit = fit_segment(observed, seg.start_index, seg.end_index).unwrap();
        assert_eq!(refit.slope_per_year, seg.slope_per_year);
        assert_eq!(refit.r_squared, seg.r_squared);
    }
}

#[test]
fn forced_detection_is_deterministic() {
    let values: Vec<f64> = (0..36).map(|m| 10.0 + (m as f64).sin() * 3.0).collect();
    let frame = monthly_frame(36, values);
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();

    let first = detector.detect_breaks(&frame, None, "h", true).unwrap();
    let second = detector.detect_breaks(&frame, None, "h", true).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.break_points, vec![12, 24]);
}

#[test]
fn identical_piecewise_lines_give_zero_chow() {
    // Residual pattern (+1, -1, -1, +1) is orthogonal to the intercept and
    // the trend in each half, so both halves share the global line.
    let pattern = [1.0, -1.0, -1.0, 1.0];
    let values: Vec<f64> = (0..8).map(|i| 3.0 + 0.5 * i as f64 + pattern[i % 4]).collect();
    let dates = daily_dates(ymd(2015, 9, 27), 8);
    let frame = SeriesFrame::univariate(dates.clone(), "count", values).unwrap();
    let config = BreakDetectorConfig::default().forced_cut_dates(vec![dates[4]]);
    let detector = BreakDetector::new(config).unwrap();

    let result = detector.detect_breaks(&frame, None, "", false).unwrap();

    assert_eq!(result.break_points, vec![4]);
    assert_relative_eq!(
        result.global_ssr.unwrap(),
        result.segments_ssr.unwrap(),
        epsilon = 1e-9
    );
    assert!(result.global_chow_f.unwrap() < 1e-9);
    assert_relative_eq!(result.global_chow_p.unwrap(), 1.0, epsilon = 1e-6);
}

#[test]
fn unsorted_input_is_sorted_without_touching_caller_data() {
    let dates = daily_dates(ymd(2015, 9, 1), 61);
    let values: Vec<f64> = (0..61).map(|i| if i < 30 { 1.0 } else { 2.0 }).collect();
    let mut reversed_dates = dates.clone();
    reversed_dates.reverse();
    let mut reversed_values = values.clone();
    reversed_values.reverse();
    let frame = SeriesFrame::univariate(reversed_dates.clone(), "count", reversed_values).unwrap();
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();

    let result = detector.detect_breaks(&frame, None, "", false).unwrap();

    assert_eq!(result.break_points, vec![30]);
    assert_eq!(frame.dates(), reversed_dates.as_slice());
}

#[test]
fn detector_is_shareable_across_threads() {
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();
    let series: Vec<Vec<TimePoint>> = (0..4)
        .map(|k| {
            monthly_dates(ymd(2014, 10, 1), 24)
                .into_iter()
                .enumerate()
                .map(|(i, d)| TimePoint::new(d, (k * 10 + i) as f64))
                .collect()
        })
        .collect();

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = series
            .iter()
            .map(|points| {
                let detector = &detector;
                s.spawn(move || detector.detect_points(points, "count", "", false))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result.break_points, vec![12]);
    }
}

#[test]
fn result_serializes_to_json() {
    let values: Vec<f64> = (0..24).map(|m| m as f64 + wiggle(m)).collect();
    let frame = monthly_frame(24, values);
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();
    let result = detector.detect_breaks(&frame, None, "", false).unwrap();

    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["break_points"], serde_json::json!([12]));
    assert_eq!(json["break_dates"], serde_json::json!(["2015-10-01"]));
    assert_eq!(json["value_column"], "count");
}

#[test]
fn infinite_chow_survives_json_round_trip() {
    let values: Vec<f64> = (0..24).map(|m| if m < 12 { 10.0 } else { 20.0 }).collect();
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();
    let result = detector
        .detect_breaks(&monthly_frame(24, values), None, "", false)
        .unwrap();
    assert_eq!(result.global_chow_f, Some(f64::INFINITY));
    assert_eq!(result.local_chow[0].f, f64::INFINITY);

    let json = serde_json::to_string(&result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["global_chow_f"], "inf");
    assert_eq!(value["local_chow"][0]["f"], "inf");

    let back: DetectionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.global_chow_f, Some(f64::INFINITY));
    assert_eq!(back.global_chow_p, Some(0.0));
    assert_eq!(back.local_chow[0].f, f64::INFINITY);
    assert_eq!(back.break_points, result.break_points);
    assert_eq!(back.break_dates, result.break_dates);
    assert_eq!(back.segments.len(), 2);
}

#[test]
fn uncomputed_chow_stays_null_in_json() {
    let frame = SeriesFrame::univariate(vec![ymd(2015, 1, 1)], "count", vec![4.0]).unwrap();
    let detector = BreakDetector::new(BreakDetectorConfig::default()).unwrap();
    let result = detector.detect_breaks(&frame, None, "", false).unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let back: DetectionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.global_chow_f, None);
    assert_eq!(back, result);
}
