//! Ordinary Least Squares (OLS) regression utilities.
//!
//! [`fit_line`] is the single-predictor fit used by every segment, global and
//! Chow computation. [`ols_fit`] handles several named regressors and reports
//! coefficient standard errors for significance testing.

use crate::error::{BreakError, Result};
use crate::utils::stats::students_t_two_sided_p;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fitted simple regression line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    /// Predicted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Sum of squared residuals of this line against `(x, y)`.
    pub fn ssr(&self, x: &[f64], y: &[f64]) -> f64 {
        x.iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| (yi - self.predict(xi)).powi(2))
            .sum()
    }

    /// Coefficient of determination of this line against `(x, y)`.
    ///
    /// A constant `y` scores 1.0 when predicted exactly and 0.0 otherwise.
    pub fn r_squared(&self, x: &[f64], y: &[f64]) -> f64 {
        if y.is_empty() {
            return f64::NAN;
        }
        let mean_y = y.iter().sum::<f64>() / y.len() as f64;
        let ss_tot: f64 = y.iter().map(|&yi| (yi - mean_y).powi(2)).sum();
        let ss_res = self.ssr(x, y);
        if ss_tot == 0.0 {
            return if ss_res == 0.0 { 1.0 } else { 0.0 };
        }
        1.0 - ss_res / ss_tot
    }
}

/// Fit `y = intercept + slope * x` by least squares.
///
/// Returns `None` for fewer than two observations or mismatched lengths.
/// When every `x` is identical the slope is 0 and the intercept is the mean
/// of `y` (minimum-norm solution).
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = y.len();
    if n < 2 || x.len() != n {
        return None;
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    // Centered sums keep precision with large day ordinals
    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        ss_xx += dx * dx;
        ss_xy += dx * (yi - mean_y);
    }

    if ss_xx == 0.0 {
        return Some(LinearFit {
            intercept: mean_y,
            slope: 0.0,
        });
    }

    let slope = ss_xy / ss_xx;
    Some(LinearFit {
        intercept: mean_y - slope * mean_x,
        slope,
    })
}

/// OLS regression coefficients, intercept and their standard errors.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Regression coefficients (one per regressor).
    pub coefficients: Vec<f64>,
    /// Intercept term.
    pub intercept: f64,
    /// Names of regressors in order.
    pub regressor_names: Vec<String>,
    /// Standard errors, intercept first, then one per regressor.
    pub std_errors: Vec<f64>,
    /// Residual degrees of freedom (n - number of parameters).
    pub df_resid: usize,
    /// Sum of squared residuals.
    pub ssr: f64,
}

impl OLSResult {
    fn position(&self, name: &str) -> Option<usize> {
        self.regressor_names.iter().position(|n| n == name)
    }

    /// Coefficient of a named regressor.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.position(name).map(|i| self.coefficients[i])
    }

    /// Standard error of a named regressor's coefficient.
    pub fn std_error(&self, name: &str) -> Option<f64> {
        self.position(name).map(|i| self.std_errors[i + 1])
    }

    /// Two-sided t-test p-value for a named regressor's coefficient.
    ///
    /// `None` when the regressor is unknown or there are no residual degrees
    /// of freedom.
    pub fn p_value(&self, name: &str) -> Option<f64> {
        if self.df_resid == 0 {
            return None;
        }
        let coef = self.coefficient(name)?;
        let se = self.std_error(name)?;
        let t = if se > 0.0 {
            coef / se
        } else if coef == 0.0 {
            0.0
        } else {
            f64::INFINITY
        };
        students_t_two_sided_p(t, self.df_resid as f64)
    }
}

/// Fit OLS regression: y = intercept + X @ coefficients
///
/// Uses Cholesky decomposition to solve the normal equations.
///
/// # Arguments
/// * `y` - Target values (length n)
/// * `regressors` - HashMap of regressor name -> values (each length n)
pub fn ols_fit(y: &[f64], regressors: &HashMap<String, Vec<f64>>) -> Result<OLSResult> {
    let n = y.len();

    // Collect regressor names in deterministic order
    let mut regressor_names: Vec<String> = regressors.keys().cloned().collect();
    regressor_names.sort();

    let k = regressor_names.len();
    let num_params = k + 1;

    if n < num_params {
        return Err(BreakError::InsufficientData {
            needed: num_params,
            got: n,
        });
    }

    for name in &regressor_names {
        let values = &regressors[name];
        if values.len() != n {
            return Err(BreakError::DimensionMismatch {
                expected: n,
                got: values.len(),
            });
        }
    }

    let x_cols: Vec<&[f64]> = regressor_names
        .iter()
        .map(|name| regressors[name].as_slice())
        .collect();

    // X'X and X'y with an implicit leading column of ones
    let mut xtx = vec![vec![0.0; num_params]; num_params];
    let mut xty = vec![0.0; num_params];
    let mut row = vec![1.0; num_params];

    for obs in 0..n {
        for j in 0..k {
            row[j + 1] = x_cols[j][obs];
        }
        for i in 0..num_params {
            xty[i] += row[i] * y[obs];
            for j in 0..num_params {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    // Add small regularization to diagonal for numerical stability
    for i in 0..num_params {
        xtx[i][i] += 1e-8;
    }

    let l = cholesky(&xtx).ok_or_else(|| {
        BreakError::ComputationError("OLS regression failed: matrix not positive definite".into())
    })?;
    let beta = cholesky_solve(&l, &xty);

    let mut ssr = 0.0;
    for obs in 0..n {
        let mut pred = beta[0];
        for j in 0..k {
            pred += beta[j + 1] * x_cols[j][obs];
        }
        ssr += (y[obs] - pred).powi(2);
    }

    let df_resid = n - num_params;
    let sigma2 = if df_resid > 0 {
        ssr / df_resid as f64
    } else {
        f64::NAN
    };

    // Diagonal of (X'X)^-1 from solving against unit vectors
    let std_errors = (0..num_params)
        .map(|j| {
            let mut unit = vec![0.0; num_params];
            unit[j] = 1.0;
            let col = cholesky_solve(&l, &unit);
            (sigma2 * col[j]).max(0.0).sqrt()
        })
        .collect();

    Ok(OLSResult {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
        regressor_names,
        std_errors,
        df_resid,
        ssr,
    })
}

/// Cholesky factor `L` of a symmetric positive definite matrix (A = L L').
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    if n == 0 {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }
    Some(l)
}

/// Solve `L L' x = b` given the Cholesky factor.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }
    x
}
