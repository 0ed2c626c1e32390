// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered-sequence statistics: smoothing, running totals, growth and extrapolation.
//!
//! Inputs are treated as equally spaced periods in their given order.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use serde::Serialize;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Share of the total needed to count as one of the vital few.
const PARETO_CUTOFF: f64 = 80.0;

/// Pareto (80/20) breakdown of a column.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pareto {
    /// Values in descending order.
    pub values: Vec<f64>,
    /// Running share of the total after each value, as a percentage.
    pub cumulative_percent: Vec<f64>,
    /// Number of leading values that together reach 80% of the total.
    pub vital_few: usize,
}

/// Exponential moving average seeded with the first value.
pub fn ema(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev = None;
    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// Trailing simple moving average.
///
/// Emits `len - window + 1` values; empty when `window` is `0` or exceeds the input.
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }
    let w = window as f64;
    values
        .windows(window)
        .map(|slice| slice.iter().sum::<f64>() / w)
        .collect()
}

/// Running sum.
pub fn cumsum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Running product.
pub fn cumprod(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(1.0, |acc, v| {
            *acc *= v;
            Some(*acc)
        })
        .collect()
}

/// Period-over-period change as a percentage.
///
/// The first period is `0`, as is any period following a `0`.
pub fn growth_rate(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(0.0);
    for pair in values.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        out.push(if prev == 0.0 {
            0.0
        } else {
            (curr - prev) / prev * 100.0
        });
    }
    out
}

/// Compound growth rate per period, as a percentage.
///
/// Returns `0` when `start <= 0` or `periods <= 0`.
pub fn cagr(start: f64, end: f64, periods: f64) -> f64 {
    if start <= 0.0 || periods <= 0.0 {
        return 0.0;
    }
    ((end / start).powf(1.0 / periods) - 1.0) * 100.0
}

/// Extends the series by `periods` steps of its mean first difference.
///
/// Needs at least two points; otherwise returns an empty vector.
pub fn forecast(values: &[f64], periods: usize) -> Vec<f64> {
    let [first, .., last] = values else {
        return Vec::new();
    };
    // The first differences telescope to `last - first`.
    let step = (last - first) / (values.len() - 1) as f64;
    let mut out = Vec::with_capacity(periods);
    let mut next = *last;
    for _ in 0..periods {
        next += step;
        out.push(next);
    }
    out
}

/// Seasonal indices: the mean at each `position % period` divided by the overall mean.
///
/// Positions without samples, or an overall mean of `0`, yield `0`.
pub fn seasonality(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }
    let mut sums = vec![0.0; period];
    let mut counts = vec![0_usize; period];
    for (i, v) in values.iter().enumerate() {
        sums[i % period] += v;
        counts[i % period] += 1;
    }

    let overall = if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    };
    sums.iter()
        .zip(&counts)
        .map(|(&s, &c)| {
            if c == 0 || overall == 0.0 {
                0.0
            } else {
                s / c as f64 / overall
            }
        })
        .collect()
}

/// Sorts descending and reports the running share of the total.
pub fn pareto(values: &[f64]) -> Pareto {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let total: f64 = sorted.iter().sum();
    if total == 0.0 {
        return Pareto {
            cumulative_percent: vec![0.0; sorted.len()],
            values: sorted,
            vital_few: 0,
        };
    }

    let mut running = 0.0;
    let cumulative_percent: Vec<f64> = sorted
        .iter()
        .map(|v| {
            running += v;
            running / total * 100.0
        })
        .collect();
    let vital_few = cumulative_percent
        .iter()
        .position(|&p| p >= PARETO_CUTOFF)
        .map_or(sorted.len(), |i| i + 1);

    Pareto {
        values: sorted,
        cumulative_percent,
        vital_few,
    }
}
