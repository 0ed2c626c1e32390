// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine defaults.

use serde::{Deserialize, Serialize};

use crate::QueryError;

/// Defaults applied when a query or operation leaves a parameter unset.
///
/// A parameter explicitly set to `0` also falls back to these defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// EMA smoothing factor.
    pub ema_alpha: f64,
    /// SMA window length.
    pub sma_window: usize,
    /// Number of NTILE buckets.
    pub ntile_count: usize,
    /// Forecast horizon for single-operation requests.
    pub operation_forecast_periods: usize,
    /// Forecast horizon for query-level advanced statistics.
    pub query_forecast_periods: usize,
    /// Seasonality period length.
    pub seasonality_period: usize,
    /// Rolling time-intelligence window length.
    pub rolling_window: usize,
    /// Histogram bin count.
    pub histogram_bins: usize,
    /// Rows considered by previews.
    pub preview_rows: usize,
    /// Absolute slope below which a trend is "stable".
    pub trend_threshold: f64,
    /// Upper bound on request-sized outputs: histogram bins, forecast periods and
    /// seasonality periods.
    pub max_output_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ema_alpha: 0.2,
            sma_window: 3,
            ntile_count: 4,
            operation_forecast_periods: 5,
            query_forecast_periods: 3,
            seasonality_period: 12,
            rolling_window: 3,
            histogram_bins: 10,
            preview_rows: 1000,
            trend_threshold: 0.01,
            max_output_len: 10_000,
        }
    }
}

impl EngineConfig {
    /// Sets the EMA smoothing factor.
    #[must_use]
    pub fn with_ema_alpha(mut self, alpha: f64) -> Self {
        self.ema_alpha = alpha;
        self
    }

    /// Sets the SMA window.
    #[must_use]
    pub fn with_sma_window(mut self, window: usize) -> Self {
        self.sma_window = window;
        self
    }

    /// Sets the rolling window.
    #[must_use]
    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }

    /// Sets the histogram bin count.
    #[must_use]
    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    /// Sets the preview row limit.
    #[must_use]
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Sets the trend slope threshold.
    #[must_use]
    pub fn with_trend_threshold(mut self, threshold: f64) -> Self {
        self.trend_threshold = threshold;
        self
    }

    /// Sets the output length bound.
    #[must_use]
    pub fn with_max_output_len(mut self, len: usize) -> Self {
        self.max_output_len = len;
        self
    }

    /// Returns `value` if it is within [`max_output_len`](Self::max_output_len).
    pub(crate) fn bounded(&self, name: &'static str, value: usize) -> Result<usize, QueryError> {
        if value > self.max_output_len {
            return Err(QueryError::ParameterTooLarge {
                name,
                value,
                max: self.max_output_len,
            });
        }
        Ok(value)
    }
}

/// Returns `value` unless it is unset or zero.
pub(crate) fn or_default(value: Option<usize>, default: usize) -> usize {
    value.filter(|v| *v != 0).unwrap_or(default)
}

/// Returns `value` unless it is unset, zero or `NaN`.
pub(crate) fn or_default_f64(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| *v != 0.0 && !v.is_nan()).unwrap_or(default)
}
