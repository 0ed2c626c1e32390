// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-operation statistics requests.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use lynx_data::{Row, column_numbers};
use lynx_stats::{LinearFit, Quartiles};
use serde::{Deserialize, Serialize};

use crate::advanced::{distribution, series_cagr};
use crate::config::{or_default, or_default_f64};
use crate::{EngineConfig, QueryError};

/// Supported single operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Pearson correlation of columns 0 and 1.
    Correlation,
    /// Linear regression of column 1 on column 0.
    Regression,
    /// Exponential moving average.
    Ema,
    /// Simple moving average.
    Sma,
    /// Running total.
    Cumsum,
    /// Competition, dense and percent ranks.
    Rank,
    /// Bucket number per value.
    Ntile,
    /// Five-number summary.
    Quartiles,
    /// Median, mode, shape and spread.
    Statistics,
    /// Period growth rates and CAGR.
    Growth,
    /// Linear forecast.
    Forecast,
    /// Z-score and min-max normalization.
    Normalize,
    /// Seasonal indices.
    Seasonality,
}

impl Operation {
    /// Every operation.
    pub const ALL: [Self; 13] = [
        Self::Correlation,
        Self::Regression,
        Self::Ema,
        Self::Sma,
        Self::Cumsum,
        Self::Rank,
        Self::Ntile,
        Self::Quartiles,
        Self::Statistics,
        Self::Growth,
        Self::Forecast,
        Self::Normalize,
        Self::Seasonality,
    ];

    /// Request name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Correlation => "correlation",
            Self::Regression => "regression",
            Self::Ema => "ema",
            Self::Sma => "sma",
            Self::Cumsum => "cumsum",
            Self::Rank => "rank",
            Self::Ntile => "ntile",
            Self::Quartiles => "quartiles",
            Self::Statistics => "statistics",
            Self::Growth => "growth",
            Self::Forecast => "forecast",
            Self::Normalize => "normalize",
            Self::Seasonality => "seasonality",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| QueryError::InvalidOperation(s.into()))
    }
}

/// Optional operation parameters. Unset or zero values use the configured defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationParams {
    /// EMA smoothing factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// SMA window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<usize>,
    /// NTILE bucket count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<usize>,
    /// Forecast horizon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods: Option<usize>,
    /// Seasonality period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<usize>,
}

/// A named operation over one or two columns of a whole dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationRequest {
    /// Operation name, checked when the request runs.
    pub operation: String,
    /// Input columns; most operations read only the first.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Parameters.
    #[serde(default)]
    pub params: OperationParams,
}

impl OperationRequest {
    /// Creates a request with default parameters.
    pub fn new<I, S>(operation: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation: operation.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            params: OperationParams::default(),
        }
    }

    /// Replaces the parameters.
    #[must_use]
    pub fn with_params(mut self, params: OperationParams) -> Self {
        self.params = params;
        self
    }
}

/// Result of a single operation; each variant serializes to its own JSON shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum OperationOutput {
    /// `{correlation}`
    Correlation {
        /// Pearson coefficient.
        correlation: f64,
    },
    /// `{slope, intercept, rSquared}`
    Regression(LinearFit),
    /// `{ema}`
    Ema {
        /// Smoothed series.
        ema: Vec<f64>,
    },
    /// `{sma}`
    Sma {
        /// Smoothed series.
        sma: Vec<f64>,
    },
    /// `{cumsum}`
    Cumsum {
        /// Running total.
        cumsum: Vec<f64>,
    },
    /// `{rank, denseRank, percentRank}`
    Rank {
        /// Competition rank.
        rank: Vec<usize>,
        /// Dense rank.
        dense_rank: Vec<usize>,
        /// Percent rank.
        percent_rank: Vec<f64>,
    },
    /// `{ntile}`
    Ntile {
        /// Bucket per value.
        ntile: Vec<usize>,
    },
    /// `{min, q1, q2, q3, max}`, or `null` for an empty dataset.
    Quartiles(Option<Quartiles>),
    /// `{median, mode, skewness, kurtosis, iqr, cv}`
    Statistics {
        /// Interpolated median.
        median: Option<f64>,
        /// Most frequent value.
        mode: Option<f64>,
        /// Population skewness.
        skewness: f64,
        /// Population excess kurtosis.
        kurtosis: f64,
        /// Interquartile range.
        iqr: f64,
        /// Coefficient of variation, in percent.
        cv: f64,
    },
    /// `{growthRates, cagr}`
    Growth {
        /// Percent change per period.
        growth_rates: Vec<f64>,
        /// CAGR from the first to the last value.
        cagr: f64,
    },
    /// `{forecast}`
    Forecast {
        /// Projected values.
        forecast: Vec<f64>,
    },
    /// `{zScore, minMax}`
    Normalize {
        /// Standard scores.
        z_score: Vec<f64>,
        /// Values rescaled to `[0, 1]`.
        min_max: Vec<f64>,
    },
    /// `{indices}`
    Seasonality {
        /// Seasonal indices.
        indices: Vec<f64>,
    },
}

/// Runs `request` over `rows`.
///
/// Fails for an unknown operation name, or for a forecast horizon or seasonality period
/// above [`EngineConfig::max_output_len`]. A missing column argument reads as an absent
/// column, i.e. all zeros.
pub fn run_operation(
    rows: &[Row],
    request: &OperationRequest,
    config: &EngineConfig,
) -> Result<OperationOutput, QueryError> {
    let op: Operation = request.operation.parse()?;
    let column = |i: usize| {
        let name = request.columns.get(i).map_or("", String::as_str);
        column_numbers(rows, name)
    };
    let params = &request.params;
    tracing::debug!(operation = %op, rows = rows.len(), "running operation");

    let out = match op {
        Operation::Correlation => OperationOutput::Correlation {
            correlation: lynx_stats::correlation(&column(0), &column(1)),
        },
        Operation::Regression => {
            OperationOutput::Regression(lynx_stats::linear_regression(&column(0), &column(1)))
        }
        Operation::Ema => OperationOutput::Ema {
            ema: lynx_stats::ema(&column(0), or_default_f64(params.alpha, config.ema_alpha)),
        },
        Operation::Sma => OperationOutput::Sma {
            sma: lynx_stats::sma(&column(0), or_default(params.window, config.sma_window)),
        },
        Operation::Cumsum => OperationOutput::Cumsum {
            cumsum: lynx_stats::cumsum(&column(0)),
        },
        Operation::Rank => {
            let values = column(0);
            OperationOutput::Rank {
                rank: lynx_stats::rank(&values),
                dense_rank: lynx_stats::dense_rank(&values),
                percent_rank: lynx_stats::percent_rank(&values),
            }
        }
        Operation::Ntile => OperationOutput::Ntile {
            ntile: lynx_stats::ntile(&column(0), or_default(params.n, config.ntile_count)),
        },
        Operation::Quartiles => OperationOutput::Quartiles(lynx_stats::quartiles(&column(0))),
        Operation::Statistics => {
            let values = column(0);
            let shape = distribution(&values);
            OperationOutput::Statistics {
                median: lynx_stats::median(&values),
                mode: lynx_stats::mode(&values),
                skewness: shape.skewness,
                kurtosis: shape.kurtosis,
                iqr: lynx_stats::iqr(&values),
                cv: shape.cv,
            }
        }
        Operation::Growth => {
            let values = column(0);
            OperationOutput::Growth {
                growth_rates: lynx_stats::growth_rate(&values),
                cagr: series_cagr(&values),
            }
        }
        Operation::Forecast => {
            let periods = or_default(params.periods, config.operation_forecast_periods);
            OperationOutput::Forecast {
                forecast: lynx_stats::forecast(&column(0), config.bounded("periods", periods)?),
            }
        }
        Operation::Normalize => {
            let values = column(0);
            OperationOutput::Normalize {
                z_score: lynx_stats::z_score(&values),
                min_max: lynx_stats::min_max_normalize(&values),
            }
        }
        Operation::Seasonality => {
            let period = or_default(params.period, config.seasonality_period);
            OperationOutput::Seasonality {
                indices: lynx_stats::seasonality(&column(0), config.bounded("period", period)?),
            }
        }
    };
    Ok(out)
}
