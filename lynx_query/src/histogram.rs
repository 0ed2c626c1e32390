// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-width histograms.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use lynx_data::{Row, column_numbers};
use serde::{Deserialize, Serialize};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Requested histogram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramSpec {
    /// Column to bin.
    pub column: String,
    /// Number of bins; unset uses the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bins: Option<usize>,
}

/// Nearest-rank percentiles of the binned column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct HistogramPercentiles {
    /// 50th percentile.
    pub p50: Option<f64>,
    /// 90th percentile.
    pub p90: Option<f64>,
    /// 99th percentile.
    pub p99: Option<f64>,
}

/// Fixed-width histogram of one column.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    /// Count per bin, from `min` upward.
    pub bins: Vec<usize>,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Width of each bin; `0` when all values are equal.
    pub bin_width: f64,
    /// Nearest-rank percentiles.
    pub percentiles: HistogramPercentiles,
}

/// Bins the coerced values of `column` into `bins` equal-width buckets.
///
/// The maximum value lands in the last bin. When every value is equal the width is `0` and
/// everything lands in bin 0. An empty row set yields all-zero bins with `min`, `max` and
/// `bin_width` of `0`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "bin index is non-negative and clamped to bins - 1"
)]
pub fn histogram(rows: &[&Row], column: &str, bins: usize) -> Histogram {
    let values = column_numbers(rows.iter().copied(), column);
    let mut counts = vec![0_usize; bins];
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Histogram {
            bins: counts,
            min: 0.0,
            max: 0.0,
            bin_width: 0.0,
            percentiles: HistogramPercentiles::default(),
        };
    };
    let bin_width = if bins == 0 { 0.0 } else { (max - min) / bins as f64 };
    if bins > 0 {
        for &v in &values {
            let idx = if bin_width > 0.0 {
                (((v - min) / bin_width).floor() as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }
    }

    let sorted = lynx_stats::sorted(&values);
    Histogram {
        bins: counts,
        min,
        max,
        bin_width,
        percentiles: HistogramPercentiles {
            p50: nearest_rank_percentile(&sorted, 50.0),
            p90: nearest_rank_percentile(&sorted, 90.0),
            p99: nearest_rank_percentile(&sorted, 99.0),
        },
    }
}

/// Nearest-rank percentile of ascending `sorted` values: element `ceil(p / 100 * n) - 1`.
///
/// Unlike [`lynx_stats::percentile`] this never interpolates; the result is always an
/// element of the input. Returns `None` for an empty input.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "rank is clamped to [1, n] before the cast"
)]
pub fn nearest_rank_percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    let rank = (p / 100.0 * n as f64).ceil().clamp(1.0, n as f64) as usize;
    Some(sorted[rank - 1])
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn rows(values: &[f64]) -> Vec<Row> {
        values.iter().map(|v| Row::new().with("x", *v)).collect()
    }

    #[test]
    fn one_value_per_bin() {
        let rows = rows(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let refs: Vec<&Row> = rows.iter().collect();
        let h = histogram(&refs, "x", 5);
        assert_eq!(h.bins, [1, 1, 1, 1, 1]);
        assert_eq!(h.min, 1.0);
        assert_eq!(h.max, 5.0);
        assert!((h.bin_width - 0.8).abs() < 1e-12, "width {}", h.bin_width);
        assert_eq!(h.percentiles.p50, Some(3.0));
        assert_eq!(h.percentiles.p90, Some(5.0));
    }

    #[test]
    fn equal_values_land_in_first_bin() {
        let rows = rows(&[7.0, 7.0, 7.0]);
        let refs: Vec<&Row> = rows.iter().collect();
        let h = histogram(&refs, "x", 4);
        assert_eq!(h.bins, [3, 0, 0, 0]);
        assert_eq!(h.bin_width, 0.0);
    }

    #[test]
    fn empty_rows_give_zero_bins() {
        let h = histogram(&[], "x", 3);
        assert_eq!(h.bins, [0, 0, 0]);
        assert_eq!((h.min, h.max, h.bin_width), (0.0, 0.0, 0.0));
        assert_eq!(h.percentiles, HistogramPercentiles::default());
        let json = serde_json::to_value(&h).unwrap();
        assert!(json["percentiles"]["p50"].is_null());
        assert!(json.get("binWidth").is_some());
    }

    #[test]
    fn nearest_rank_differs_from_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(nearest_rank_percentile(&sorted, 50.0), Some(2.0));
        assert_eq!(lynx_stats::percentile(&sorted, 50.0), Some(2.5));
        assert_eq!(nearest_rank_percentile(&sorted, 0.0), Some(1.0));
        assert_eq!(nearest_rank_percentile(&sorted, 100.0), Some(4.0));
        assert_eq!(nearest_rank_percentile(&[], 50.0), None);
    }
}
