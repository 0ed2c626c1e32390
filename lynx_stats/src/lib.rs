// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Statistics over `f64` sequences.
//!
//! Every function here is pure and total: degenerate inputs (empty sequences, zero variance,
//! zero ranges, division by zero) produce a documented fallback rather than `NaN` or an
//! infinity, so results can be serialized as-is.
//!
//! Callers are expected to have already extracted and coerced a column; nothing in this crate
//! knows about rows or schemas.
//!
//! Two percentile flavors exist in Lynx. [`percentile`] here interpolates linearly between
//! closest ranks; histogram summaries use a nearest-rank variant that lives with the histogram
//! code. They disagree on small samples and are kept apart on purpose.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod descriptive;
#[cfg(not(feature = "std"))]
mod float;
mod rank;
mod regression;
mod series;

pub use descriptive::{
    ColumnSummary, Quartiles, coefficient_of_variation, iqr, kurtosis, mean, median,
    min_max_normalize, mode, percentile, quartiles, skewness, sorted, std_dev, sum, summary,
    variance, z_score,
};
pub use rank::{dense_rank, ntile, percent_rank, rank};
pub use regression::{LinearFit, correlation, correlation_matrix, linear_regression};
pub use series::{
    Pareto, cagr, cumprod, cumsum, ema, forecast, growth_rate, pareto, seasonality, sma,
};
