// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named advanced statistics attached to a query.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use lynx_data::{Row, column_numbers};
use lynx_stats::{LinearFit, Pareto, Quartiles};
use serde::{Deserialize, Serialize};

use crate::EngineConfig;
use crate::config::{or_default, or_default_f64};

/// Two columns read as `x` and `y`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPair {
    /// Column read as `x`.
    pub x_column: String,
    /// Column read as `y`.
    pub y_column: String,
}

/// Exponential moving average request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmaSpec {
    /// Column to smooth.
    pub column: String,
    /// Smoothing factor; unset or `0` uses the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

/// Simple moving average request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmaSpec {
    /// Column to smooth.
    pub column: String,
    /// Window length; unset or `0` uses the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<usize>,
}

/// Linear forecast request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSpec {
    /// Column to extend.
    pub column: String,
    /// Number of periods to project; unset or `0` uses the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<usize>,
}

/// Seasonality request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalitySpec {
    /// Column to analyse.
    pub column: String,
    /// Season length; unset or `0` uses the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lag: Option<usize>,
}

/// Advanced statistics to compute over the filtered rows.
///
/// Each field names the column(s) to read; unset fields are skipped. Unknown keys in JSON
/// are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvancedSpec {
    /// Pearson correlation of two columns.
    pub correlation: Option<ColumnPair>,
    /// Linear regression of `y` on `x`.
    pub regression: Option<ColumnPair>,
    /// Interpolated median.
    pub median: Option<String>,
    /// Most frequent value.
    pub mode: Option<String>,
    /// Five-number summary.
    pub quartiles: Option<String>,
    /// Exponential moving average.
    pub ema: Option<EmaSpec>,
    /// Simple moving average.
    pub sma: Option<SmaSpec>,
    /// Running total.
    pub cumsum: Option<String>,
    /// Period-over-period growth and CAGR.
    pub growth_rate: Option<String>,
    /// Standard scores.
    pub z_scores: Option<String>,
    /// Competition rank and percent rank.
    pub rank: Option<String>,
    /// Linear forecast.
    pub forecast: Option<ForecastSpec>,
    /// Skewness, kurtosis and coefficient of variation.
    pub distribution: Option<String>,
    /// Pareto breakdown.
    pub pareto: Option<String>,
    /// Seasonal indices.
    pub seasonality: Option<SeasonalitySpec>,
}

impl AdvancedSpec {
    /// Returns `true` if no statistic is requested.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Correlation with the columns it was computed from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// Pearson coefficient.
    pub value: f64,
    /// `[x, y]` column names.
    pub columns: [String; 2],
}

/// Shape statistics of one column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Distribution {
    /// Population skewness.
    pub skewness: f64,
    /// Population excess kurtosis.
    pub kurtosis: f64,
    /// Coefficient of variation, in percent.
    pub cv: f64,
}

/// Results of the requested advanced statistics; absent entries were not requested.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedResults {
    /// Pearson correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationResult>,
    /// Least-squares fit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression: Option<LinearFit>,
    /// `Some(None)` when requested over no rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<Option<f64>>,
    /// `Some(None)` when requested over no rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Option<f64>>,
    /// `Some(None)` when requested over no rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quartiles: Option<Option<Quartiles>>,
    /// Exponential moving average.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema: Option<Vec<f64>>,
    /// Simple moving average.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma: Option<Vec<f64>>,
    /// Running total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumsum: Option<Vec<f64>>,
    /// Percent change per period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<Vec<f64>>,
    /// CAGR from the first to the last value, reported with `growth_rate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cagr: Option<f64>,
    /// Standard scores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_scores: Option<Vec<f64>>,
    /// Competition rank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<Vec<usize>>,
    /// Percent rank, reported with `rank`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_rank: Option<Vec<f64>>,
    /// Projected values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<f64>>,
    /// Shape statistics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,
    /// Pareto breakdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pareto: Option<Pareto>,
    /// Seasonal indices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<Vec<f64>>,
}

/// Computes every statistic requested in `spec` over `rows`.
pub fn run_advanced(rows: &[&Row], spec: &AdvancedSpec, config: &EngineConfig) -> AdvancedResults {
    let col = |name: &str| column_numbers(rows.iter().copied(), name);
    let mut out = AdvancedResults::default();

    if let Some(pair) = &spec.correlation {
        out.correlation = Some(CorrelationResult {
            value: lynx_stats::correlation(&col(&pair.x_column), &col(&pair.y_column)),
            columns: [pair.x_column.clone(), pair.y_column.clone()],
        });
    }
    if let Some(pair) = &spec.regression {
        out.regression = Some(lynx_stats::linear_regression(
            &col(&pair.x_column),
            &col(&pair.y_column),
        ));
    }
    if let Some(c) = &spec.median {
        out.median = Some(lynx_stats::median(&col(c)));
    }
    if let Some(c) = &spec.mode {
        out.mode = Some(lynx_stats::mode(&col(c)));
    }
    if let Some(c) = &spec.quartiles {
        out.quartiles = Some(lynx_stats::quartiles(&col(c)));
    }
    if let Some(ema) = &spec.ema {
        let alpha = or_default_f64(ema.alpha, config.ema_alpha);
        out.ema = Some(lynx_stats::ema(&col(&ema.column), alpha));
    }
    if let Some(sma) = &spec.sma {
        let window = or_default(sma.window, config.sma_window);
        out.sma = Some(lynx_stats::sma(&col(&sma.column), window));
    }
    if let Some(c) = &spec.cumsum {
        out.cumsum = Some(lynx_stats::cumsum(&col(c)));
    }
    if let Some(c) = &spec.growth_rate {
        let values = col(c);
        out.growth_rate = Some(lynx_stats::growth_rate(&values));
        out.cagr = Some(series_cagr(&values));
    }
    if let Some(c) = &spec.z_scores {
        out.z_scores = Some(lynx_stats::z_score(&col(c)));
    }
    if let Some(c) = &spec.rank {
        let values = col(c);
        out.rank = Some(lynx_stats::rank(&values));
        out.percent_rank = Some(lynx_stats::percent_rank(&values));
    }
    if let Some(f) = &spec.forecast {
        let periods = or_default(f.periods, config.query_forecast_periods);
        out.forecast = Some(lynx_stats::forecast(&col(&f.column), periods));
    }
    if let Some(c) = &spec.distribution {
        out.distribution = Some(distribution(&col(c)));
    }
    if let Some(c) = &spec.pareto {
        out.pareto = Some(lynx_stats::pareto(&col(c)));
    }
    if let Some(s) = &spec.seasonality {
        let period = or_default(s.max_lag, config.seasonality_period);
        out.seasonality = Some(lynx_stats::seasonality(&col(&s.column), period));
    }
    out
}

/// CAGR from the first to the last value over `len - 1` periods.
#[allow(clippy::cast_precision_loss, reason = "period counts are small")]
pub(crate) fn series_cagr(values: &[f64]) -> f64 {
    match values {
        [first, .., last] => lynx_stats::cagr(*first, *last, (values.len() - 1) as f64),
        _ => 0.0,
    }
}

pub(crate) fn distribution(values: &[f64]) -> Distribution {
    Distribution {
        skewness: lynx_stats::skewness(values),
        kurtosis: lynx_stats::kurtosis(values),
        cv: lynx_stats::coefficient_of_variation(values),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn rows() -> Vec<Row> {
        [(100.0, 10.0), (120.0, 12.0), (150.0, 15.0), (130.0, 13.0), (170.0, 17.0)]
            .iter()
            .map(|&(sales, profit)| Row::new().with("sales", sales).with("profit", profit))
            .collect()
    }

    #[test]
    fn only_requested_statistics_are_computed() {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        let spec: AdvancedSpec = serde_json::from_str(
            r#"{"correlation": {"xColumn": "sales", "yColumn": "profit"},
                "median": "sales", "unknownThing": "sales"}"#,
        )
        .unwrap();
        let out = run_advanced(&refs, &spec, &EngineConfig::default());
        let corr = out.correlation.as_ref().unwrap();
        assert!((corr.value - 1.0).abs() < 1e-12, "corr {}", corr.value);
        assert_eq!(corr.columns, [String::from("sales"), String::from("profit")]);
        assert_eq!(out.median, Some(Some(130.0)));
        assert!(out.ema.is_none() && out.rank.is_none());

        let json = serde_json::to_value(&out).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2, "unexpected keys {keys:?}");
    }

    #[test]
    fn defaults_fill_unset_parameters() {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        let spec = AdvancedSpec {
            sma: Some(SmaSpec {
                column: "sales".into(),
                window: None,
            }),
            forecast: Some(ForecastSpec {
                column: "sales".into(),
                periods: Some(0),
            }),
            seasonality: Some(SeasonalitySpec {
                column: "sales".into(),
                max_lag: Some(2),
            }),
            ..AdvancedSpec::default()
        };
        let out = run_advanced(&refs, &spec, &EngineConfig::default());
        assert_eq!(out.sma.as_ref().map(Vec::len), Some(3));
        // Mean step (170 - 100) / 4 = 17.5 over three periods.
        assert_eq!(out.forecast, Some(vec![187.5, 205.0, 222.5]));
        assert_eq!(out.seasonality.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn growth_reports_cagr() {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        let spec = AdvancedSpec {
            growth_rate: Some("sales".into()),
            rank: Some("sales".into()),
            ..AdvancedSpec::default()
        };
        let out = run_advanced(&refs, &spec, &EngineConfig::default());
        let growth = out.growth_rate.unwrap();
        assert_eq!(growth[0], 0.0);
        assert!((growth[1] - 20.0).abs() < 1e-9, "growth {growth:?}");
        let cagr = out.cagr.unwrap();
        assert!((cagr - (1.7_f64.powf(0.25) - 1.0) * 100.0).abs() < 1e-9);
        assert_eq!(out.rank, Some(vec![1, 2, 4, 3, 5]));
        assert_eq!(out.percent_rank, Some(vec![0.0, 0.25, 0.75, 0.5, 1.0]));
    }

    #[test]
    fn empty_rows_use_sentinels() {
        let spec = AdvancedSpec {
            median: Some("sales".into()),
            quartiles: Some("sales".into()),
            ..AdvancedSpec::default()
        };
        let out = run_advanced(&[], &spec, &EngineConfig::default());
        assert_eq!(out.median, Some(None));
        assert_eq!(out.quartiles, Some(None));
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("median").is_some_and(serde_json::Value::is_null));
        assert!(AdvancedSpec::default().is_empty());
        assert!(!spec.is_empty());
    }
}
