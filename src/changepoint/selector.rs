//! Break index selection: forced cut dates or automatic relative-jump search.
//!
//! The automatic path is a conservative heuristic. A point is a candidate when
//! its relative jump from the previous value exceeds `mean + 3σ` of all jumps.
//! When more candidates than allowed are found, the one closest to the
//! reference transition date is kept first, then the earliest candidates that
//! lie more than [`MIN_BREAK_SPACING_DAYS`] from every kept break. This favours
//! the known external event and temporal separation over jump magnitude.

use crate::core::TimePoint;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Guard added to the denominator of relative changes.
pub const RELATIVE_CHANGE_EPSILON: f64 = 1e-10;

/// Number of standard deviations above the mean jump that marks a break.
pub const JUMP_THRESHOLD_SIGMAS: f64 = 3.0;

/// Series with this many points or fewer never yield automatic breaks.
pub const MAX_POINTS_WITHOUT_SIGNAL: usize = 4;

/// Minimum distance in days between prioritized breaks.
pub const MIN_BREAK_SPACING_DAYS: i64 = 90;

/// How break indices are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SegmentationMode {
    /// Cut at configured calendar dates regardless of the data.
    #[default]
    Forced,
    /// Cut after unusually large relative jumps.
    Automatic,
}

/// Chooses interior break indices for a date-sorted series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangepointSelector {
    pub mode: SegmentationMode,
    pub cut_dates: Vec<NaiveDate>,
    pub transition_date: NaiveDate,
    pub max_breaks: usize,
}

impl ChangepointSelector {
    /// Sorted, deduplicated break indices, each in `1..points.len()`.
    pub fn select(&self, points: &[TimePoint]) -> Vec<usize> {
        let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();

        let mut indices = match self.mode {
            SegmentationMode::Forced => forced_break_indices(&dates, &self.cut_dates),
            SegmentationMode::Automatic => {
                let values: Vec<f64> = points.iter().map(|p| p.value).collect();
                let candidates = find_jump_breaks(&values);
                if candidates.len() > self.max_breaks {
                    log::warn!(
                        "limiting {} detected breaks to {}",
                        candidates.len(),
                        self.max_breaks
                    );
                    prioritize_breaks(
                        &candidates,
                        &dates,
                        self.transition_date,
                        self.max_breaks,
                    )
                } else {
                    candidates
                }
            }
        };

        indices.retain(|&i| i > 0 && i < points.len());
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// Map calendar cut dates onto a sorted date column.
///
/// Each cut inside `[min, max]` is placed at its leftmost insertion point;
/// cuts outside the range, or landing on the first position, are dropped.
pub fn forced_break_indices(sorted_dates: &[NaiveDate], cut_dates: &[NaiveDate]) -> Vec<usize> {
    let (Some(&first), Some(&last)) = (sorted_dates.first(), sorted_dates.last()) else {
        return Vec::new();
    };

    let mut indices: Vec<usize> = cut_dates
        .iter()
        .filter(|&&cut| first <= cut && cut <= last)
        .map(|&cut| sorted_dates.partition_point(|&d| d < cut))
        .filter(|&idx| idx > 0 && idx < sorted_dates.len())
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Relative change between consecutive values: `|Δv[i]| / (|v[i]| + ε)`.
pub fn relative_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| (w[1] - w[0]).abs() / (w[0].abs() + RELATIVE_CHANGE_EPSILON))
        .collect()
}

/// Indices just after jumps exceeding `mean + 3σ` of all relative changes.
pub fn find_jump_breaks(values: &[f64]) -> Vec<usize> {
    if values.len() <= MAX_POINTS_WITHOUT_SIGNAL {
        return Vec::new();
    }

    let changes = relative_changes(values);
    let n = changes.len() as f64;
    let mean = changes.iter().sum::<f64>() / n;
    let std = (changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n).sqrt();
    let threshold = mean + JUMP_THRESHOLD_SIGMAS * std;

    changes
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > threshold)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Reduce candidate breaks to at most `max_breaks`.
///
/// Keeps the candidate closest to `transition` (earliest on ties), then scans
/// the remaining candidates in candidate order, keeping each one that is
/// more than [`MIN_BREAK_SPACING_DAYS`] from every break kept so far.
pub fn prioritize_breaks(
    candidates: &[usize],
    dates: &[NaiveDate],
    transition: NaiveDate,
    max_breaks: usize,
) -> Vec<usize> {
    if max_breaks == 0 {
        return Vec::new();
    }

    let distance = |idx: usize| -> Option<i64> {
        dates
            .get(idx)
            .map(|&d| (d - transition).num_days().abs())
    };

    let mut closest: Option<(usize, i64)> = None;
    for (pos, &idx) in candidates.iter().enumerate() {
        if let Some(days) = distance(idx) {
            if closest.map_or(true, |(_, best)| days < best) {
                closest = Some((pos, days));
            }
        }
    }
    let Some((closest_pos, _)) = closest else {
        return Vec::new();
    };

    let mut kept = vec![candidates[closest_pos]];
    for (pos, &idx) in candidates.iter().enumerate() {
        if kept.len() >= max_breaks {
            break;
        }
        if pos == closest_pos {
            continue;
        }
        let Some(&date) = dates.get(idx) else {
            continue;
        };
        let spaced = kept
            .iter()
            .all(|&k| (date - dates[k]).num_days().abs() > MIN_BREAK_SPACING_DAYS);
        if spaced {
            kept.push(idx);
        }
    }
    kept
}
