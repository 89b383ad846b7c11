//! Chow F-tests comparing one regression line against piecewise lines.
//!
//! The restricted model is a single OLS line over the whole window; the
//! unrestricted model fits a separate line per segment. A large F means the
//! split explains the data far better than one trend.

use crate::core::TimePoint;
use crate::utils::ols::fit_line;
use crate::utils::stats::f_survival;
use serde::{Deserialize, Serialize};

/// Parameters per simple regression (intercept + slope).
pub const PARAMS_PER_REGRESSION: usize = 2;

/// F statistic and upper-tail p-value of a Chow test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChowStatistic {
    /// F statistic; `+inf` when the unrestricted model fits exactly.
    #[serde(with = "crate::utils::float_serde")]
    pub f: f64,
    /// `1 - CDF_F(f)`.
    pub p_value: f64,
    /// Numerator degrees of freedom.
    pub df_num: usize,
    /// Denominator degrees of freedom.
    pub df_den: usize,
}

impl ChowStatistic {
    /// Whether the single-line model is rejected at level `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

fn chow_from_ssr(
    ssr_restricted: f64,
    ssr_unrestricted: f64,
    df_num: usize,
    df_den: usize,
) -> Option<ChowStatistic> {
    let num = (ssr_restricted - ssr_unrestricted) / df_num.max(1) as f64;
    let den = ssr_unrestricted / df_den.max(1) as f64;
    if den <= 0.0 {
        return Some(ChowStatistic {
            f: f64::INFINITY,
            p_value: 0.0,
            df_num,
            df_den,
        });
    }

    // Rounding can leave a hair below zero when both models coincide
    let f = (num / den).max(0.0);
    let p_value = f_survival(f, df_num as f64, df_den as f64)?;
    Some(ChowStatistic {
        f,
        p_value,
        df_num,
        df_den,
    })
}

/// Generalized Chow test for `s` segments.
///
/// `F = ((SSR_r - SSR_ur) / ((s-1)k)) / (SSR_ur / (n - sk))`.
///
/// # Arguments
/// * `n` - Total number of points
/// * `k` - Parameters per regression
/// * `s` - Number of segments in the unrestricted model
/// * `ssr_restricted` - SSR of the single global line
/// * `ssr_unrestricted` - Summed SSR of the segment lines
///
/// # Returns
/// `None` when `s <= 1` or `n <= s·k`.
pub fn chow_test_multi(
    n: usize,
    k: usize,
    s: usize,
    ssr_restricted: f64,
    ssr_unrestricted: f64,
) -> Option<ChowStatistic> {
    if s <= 1 || n <= s * k {
        return None;
    }
    chow_from_ssr(ssr_restricted, ssr_unrestricted, (s - 1) * k, n - s * k)
}

/// Classic two-segment Chow test at a single break.
///
/// Fits lines over all points, over `points[..break_index]` and over
/// `points[break_index..]`, ignoring any other breaks.
///
/// # Returns
/// `None` unless each side holds at least `k + 1` points.
pub fn local_chow_test(
    points: &[TimePoint],
    break_index: usize,
    k: usize,
) -> Option<ChowStatistic> {
    let n = points.len();
    if break_index == 0 || break_index + 1 >= n {
        return None;
    }
    let left_n = break_index;
    let right_n = n - break_index;
    if left_n < k + 1 || right_n < k + 1 {
        return None;
    }
    if n <= 2 * k {
        return None;
    }

    let x: Vec<f64> = points.iter().map(|p| p.ordinal()).collect();
    let y: Vec<f64> = points.iter().map(|p| p.value).collect();
    let (x1, x2) = x.split_at(break_index);
    let (y1, y2) = y.split_at(break_index);

    let full = fit_line(&x, &y)?;
    let left = fit_line(x1, y1)?;
    let right = fit_line(x2, y2)?;

    let ssr_full = full.ssr(&x, &y);
    let ssr_unrestricted = left.ssr(x1, y1) + right.ssr(x2, y2);

    chow_from_ssr(ssr_full, ssr_unrestricted, k, n - 2 * k)
}
