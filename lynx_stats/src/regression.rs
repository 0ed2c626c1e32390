// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Correlation and least-squares fits.

extern crate alloc;

use alloc::vec::Vec;

use serde::Serialize;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Result of a simple linear regression `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearFit {
    /// Change in `y` per unit of `x`.
    pub slope: f64,
    /// Value of `y` at `x = 0`.
    pub intercept: f64,
    /// Square of the Pearson correlation.
    pub r_squared: f64,
}

/// Pearson correlation coefficient.
///
/// Returns `0` when the lengths differ, the input is empty, or either side has zero variance.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 { 0.0 } else { sxy / denom }
}

/// Ordinary least squares fit of `y` on `x`.
///
/// Returns the zero fit on mismatched or empty input. When `x` has no spread the slope is `0`
/// and the intercept is the mean of `y`.
pub fn linear_regression(x: &[f64], y: &[f64]) -> LinearFit {
    if x.len() != y.len() || x.is_empty() {
        return LinearFit::default();
    }
    let n = x.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        sx += a;
        sy += b;
        sxy += a * b;
        sxx += a * a;
    }

    let denom = n * sxx - sx * sx;
    if denom == 0.0 {
        return LinearFit {
            slope: 0.0,
            intercept: sy / n,
            r_squared: 0.0,
        };
    }
    let slope = (n * sxy - sx * sy) / denom;
    let r = correlation(x, y);
    LinearFit {
        slope,
        intercept: (sy - slope * sx) / n,
        r_squared: r * r,
    }
}

/// Pairwise correlations of `columns`; `matrix[i][j] == correlation(columns[i], columns[j])`.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    columns
        .iter()
        .map(|a| columns.iter().map(|b| correlation(a, b)).collect())
        .collect()
}
