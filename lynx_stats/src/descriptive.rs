// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Central tendency, dispersion and shape.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use serde::Serialize;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Five-number summary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Quartiles {
    /// Smallest value.
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    /// Median.
    pub q2: f64,
    /// 75th percentile.
    pub q3: f64,
    /// Largest value.
    pub max: f64,
}

/// Descriptive statistics for one column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Number of values.
    pub count: usize,
    /// Sum of values.
    pub sum: f64,
    /// Arithmetic mean (`0` when empty).
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Smallest value.
    pub min: Option<f64>,
    /// Largest value.
    pub max: Option<f64>,
    /// Interpolated median.
    pub median: Option<f64>,
    /// Interpolated 25th percentile.
    pub q1: Option<f64>,
    /// Interpolated 75th percentile.
    pub q3: Option<f64>,
    /// Population skewness.
    pub skewness: f64,
    /// Population excess kurtosis.
    pub kurtosis: f64,
}

/// Sum of all values.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean, `0` for an empty sequence.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) / values.len() as f64
}

/// Population variance (divides by `n`), `0` for an empty sequence.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Returns an ascending copy of `values`.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Percentile by linear interpolation between closest ranks.
///
/// The fractional index is `p / 100 * (n - 1)`. `p` is clamped to `[0, 100]`. The input does
/// not need to be sorted. Returns `None` for an empty sequence.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    Some(percentile_of_sorted(&sorted, p))
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "index is clamped to [0, n - 1] before the cast"
)]
fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
    let idx = p / 100.0 * last as f64;
    let lower = idx.floor() as usize;
    let upper = (idx.ceil() as usize).min(last);
    if lower == upper {
        return sorted[lower];
    }
    sorted[lower] + (sorted[upper] - sorted[lower]) * (idx - lower as f64)
}

/// Interpolated median.
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 50.0)
}

/// Most frequent value. Ties go to the value whose count peaked first in input order.
pub fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    let mut best = *values.first()?;
    let mut best_count = 0;
    for &v in values {
        // -0.0 and 0.0 share a bucket.
        let key = if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() };
        let count = counts.entry(key).or_insert(0);
        *count += 1;
        if *count > best_count {
            best_count = *count;
            best = v;
        }
    }
    Some(best)
}

/// Min, quartiles and max of `values`.
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    let sorted = sorted(values);
    let (&min, &max) = (sorted.first()?, sorted.last()?);
    Some(Quartiles {
        min,
        q1: percentile_of_sorted(&sorted, 25.0),
        q2: percentile_of_sorted(&sorted, 50.0),
        q3: percentile_of_sorted(&sorted, 75.0),
        max,
    })
}

/// Interquartile range, `0` for an empty sequence.
pub fn iqr(values: &[f64]) -> f64 {
    quartiles(values).map_or(0.0, |q| q.q3 - q.q1)
}

/// Standard deviation as a percentage of the mean; `0` when the mean is `0`.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    std_dev(values) / m * 100.0
}

/// Second, third and fourth central moments (population).
fn moments(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let m = mean(values);
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Population skewness; `0` when the variance is `0` or the input is empty.
pub fn skewness(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let (m2, m3, _) = moments(values);
    let sd = m2.sqrt();
    if sd == 0.0 {
        return 0.0;
    }
    m3 / (sd * sd * sd)
}

/// Population excess kurtosis (normal is `0`); `0` when the variance is `0` or the input is
/// empty.
pub fn kurtosis(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let (m2, _, m4) = moments(values);
    if m2 == 0.0 {
        return 0.0;
    }
    m4 / (m2 * m2) - 3.0
}

/// Standard scores. All zeros when the standard deviation is `0`.
pub fn z_score(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = std_dev(values);
    if sd == 0.0 {
        return values.iter().map(|_| 0.0).collect();
    }
    values.iter().map(|v| (v - m) / sd).collect()
}

/// Rescales into `[0, 1]`. All `0.5` when every value is equal.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range == 0.0 {
        return values.iter().map(|_| 0.5).collect();
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Describes a column in one pass over its sorted copy.
pub fn summary(values: &[f64]) -> ColumnSummary {
    let sorted = sorted(values);
    let pct = |p| (!sorted.is_empty()).then(|| percentile_of_sorted(&sorted, p));
    ColumnSummary {
        count: values.len(),
        sum: sum(values),
        mean: mean(values),
        std: std_dev(values),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        median: pct(50.0),
        q1: pct(25.0),
        q3: pct(75.0),
        skewness: skewness(values),
        kurtosis: kurtosis(values),
    }
}
