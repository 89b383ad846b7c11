//! Property-based tests for break detection.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use structural_breaks::breaks::{fit_segment, BreakDetector, BreakDetectorConfig};
use structural_breaks::core::TimePoint;
use structural_breaks::validation::{chow_test_multi, local_chow_test};

/// Points three days apart starting mid-2015 so forced cuts can land inside.
fn make_points(values: &[f64]) -> Vec<TimePoint> {
    let start = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| TimePoint::new(start + Duration::days(i as i64 * 3), v))
        .collect()
}

/// Strategy for generating valid series values.
fn values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, min_len..max_len)
}

/// Strategy for strictly increasing series.
fn increasing_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01..50.0_f64, min_len..max_len).prop_map(|steps| {
        steps
            .iter()
            .scan(100.0, |acc, step| {
                *acc += step;
                Some(*acc)
            })
            .collect()
    })
}

fn detectors() -> Vec<BreakDetector> {
    vec![
        BreakDetector::new(BreakDetectorConfig::default()).unwrap(),
        BreakDetector::new(BreakDetectorConfig::default().automatic()).unwrap(),
        BreakDetector::new(BreakDetectorConfig::default().automatic().max_breaks(1)).unwrap(),
    ]
}

proptest! {
    #[test]
    fn break_points_are_interior_and_sorted(values in values_strategy(0, 200)) {
        let points = make_points(&values);
        for detector in detectors() {
            let result = detector.detect_points(&points, "count", "", false).unwrap();
            for &b in &result.break_points {
                prop_assert!(b > 0 && b < points.len());
            }
            prop_assert!(result.break_points.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(result.total_breaks, result.break_points.len());
            prop_assert_eq!(result.break_dates.len(), result.break_points.len());
            prop_assert_eq!(result.transition_alignment.len(), result.break_points.len());
        }
    }

    #[test]
    fn automatic_breaks_respect_maximum(
        values in values_strategy(5, 200),
        max_breaks in 0usize..4,
    ) {
        let detector = BreakDetector::new(
            BreakDetectorConfig::default().automatic().max_breaks(max_breaks),
        )
        .unwrap();
        let result = detector.detect_points(&make_points(&values), "count", "", false).unwrap();
        prop_assert!(result.total_breaks <= max_breaks);
    }

    #[test]
    fn single_segment_scores_zero(values in values_strategy(0, 200)) {
        for detector in detectors() {
            let result = detector.detect_points(&make_points(&values), "count", "", false).unwrap();
            if result.segments.len() <= 1 {
                prop_assert_eq!(result.break_score, 0.0);
            } else {
                prop_assert!(result.break_score >= 0.0);
            }
        }
    }

    #[test]
    fn detection_is_deterministic(values in values_strategy(0, 150)) {
        let points = make_points(&values);
        for detector in detectors() {
            let first = detector.detect_points(&points, "count", "p", true).unwrap();
            let second = detector.detect_points(&points, "count", "p", true).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn statistics_are_never_nan(values in values_strategy(0, 150)) {
        for detector in detectors() {
            let result = detector.detect_points(&make_points(&values), "count", "", false).unwrap();
            prop_assert!(!result.break_score.is_nan());
            if let (Some(f), Some(p)) = (result.global_chow_f, result.global_chow_p) {
                prop_assert!(f >= 0.0);
                prop_assert!((0.0..=1.0).contains(&p));
            }
            for local in &result.local_chow {
                prop_assert!(local.f >= 0.0);
                prop_assert!((0.0..=1.0).contains(&local.p_value));
            }
            for seg in &result.segments {
                prop_assert!(!seg.r_squared.is_nan());
            }
        }
    }

    #[test]
    fn increasing_segment_has_positive_slope(values in increasing_strategy(2, 100)) {
        let points = make_points(&values);
        let seg = fit_segment(&points, 0, points.len()).unwrap();
        prop_assert!(seg.slope_per_year > 0.0);
    }

    #[test]
    fn decreasing_segment_has_negative_slope(values in increasing_strategy(2, 100)) {
        let reversed: Vec<f64> = values.iter().rev().copied().collect();
        let points = make_points(&reversed);
        let seg = fit_segment(&points, 0, points.len()).unwrap();
        prop_assert!(seg.slope_per_year < 0.0);
    }

    #[test]
    fn local_chow_is_defined_or_absent(values in values_strategy(0, 60), split in 0usize..60) {
        let points = make_points(&values);
        match local_chow_test(&points, split, 2) {
            Some(stat) => {
                prop_assert!(split >= 3 && points.len() - split >= 3);
                prop_assert!(stat.f >= 0.0);
            }
            None => prop_assert!(split < 3 || split + 3 > points.len()),
        }
    }

    #[test]
    fn multi_chow_equal_ssr_is_zero(n in 5usize..100, ssr in 0.001..1e6_f64) {
        let stat = chow_test_multi(n, 2, 2, ssr, ssr).unwrap();
        prop_assert_eq!(stat.f, 0.0);
    }
}
