// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time intelligence: period-over-period change, rolling windows and trends.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use lynx_data::{Row, Value};
use serde::{Deserialize, Serialize};

use crate::config::or_default;
use crate::{EngineConfig, Measure};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Requested time analysis, tagged by `type` in JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum TimeSpec {
    /// Month-over-month change of the measure.
    Mom {
        /// Column holding the row date.
        date_column: String,
    },
    /// Year-over-year change of the measure.
    Yoy {
        /// Column holding the row date.
        date_column: String,
    },
    /// Measure over each trailing window of consecutive rows.
    Rolling {
        /// Column holding the row date.
        date_column: String,
        /// Window length in rows; unset or `0` uses the configured default.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window: Option<usize>,
    },
    /// Direction of the per-row measure over time.
    Trend {
        /// Column holding the row date.
        date_column: String,
    },
}

impl TimeSpec {
    /// Column holding the row date.
    pub fn date_column(&self) -> &str {
        match self {
            Self::Mom { date_column }
            | Self::Yoy { date_column }
            | Self::Rolling { date_column, .. }
            | Self::Trend { date_column } => date_column,
        }
    }
}

/// Measure value for one period and its change from the previous period.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PeriodChange {
    /// Period key, `YYYY-MM` or `YYYY`.
    pub period: String,
    /// Measure over the period.
    pub value: Option<f64>,
    /// Percent change from the previous period, `0` when the previous value is zero.
    pub change: f64,
}

/// Measure over one rolling window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RollingPoint {
    /// Index of the window's last row in date order.
    pub index: usize,
    /// Measure over the window.
    pub value: Option<f64>,
}

/// Trend classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Slope above the threshold.
    Up,
    /// Slope below the negated threshold.
    Down,
    /// Anything in between.
    Stable,
}

/// Linear trend of the per-row measure against row position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Trend {
    /// Classified direction.
    pub direction: TrendDirection,
    /// Least-squares slope.
    pub slope: f64,
}

/// Output of [`analyze_time`], shaped by the requested [`TimeSpec`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TimeAnalysis {
    /// Month-over-month or year-over-year changes, one per period after the first.
    Periods(Vec<PeriodChange>),
    /// One point per full trailing window.
    Rolling(Vec<RollingPoint>),
    /// Trend summary.
    Trend(Trend),
}

/// Runs a time analysis of `measure` over `rows`.
///
/// Rows are stably sorted by their parsed date. Rows whose date does not parse sort last and
/// are left out of month and year buckets.
pub fn analyze_time(
    rows: &[&Row],
    spec: &TimeSpec,
    measure: &Measure,
    config: &EngineConfig,
) -> TimeAnalysis {
    let date_column = spec.date_column();
    let mut dated: Vec<(Option<NaiveDateTime>, &Row)> = rows
        .iter()
        .map(|&row| (row.get(date_column).and_then(parse_date), row))
        .collect();
    dated.sort_by_key(|(date, _)| (date.is_none(), *date));

    let undated = dated.iter().filter(|(d, _)| d.is_none()).count();
    if undated > 0 {
        tracing::warn!(undated, column = date_column, "rows with unparseable dates");
    }

    match spec {
        TimeSpec::Mom { .. } => TimeAnalysis::Periods(period_changes(&dated, measure, |d| {
            format!("{:04}-{:02}", d.year(), d.month())
        })),
        TimeSpec::Yoy { .. } => TimeAnalysis::Periods(period_changes(&dated, measure, |d| {
            format!("{:04}", d.year())
        })),
        TimeSpec::Rolling { window, .. } => {
            let window = or_default(*window, config.rolling_window);
            let sorted: Vec<&Row> = dated.iter().map(|(_, r)| *r).collect();
            TimeAnalysis::Rolling(rolling(&sorted, measure, window))
        }
        TimeSpec::Trend { .. } => {
            let values: Vec<f64> = dated
                .iter()
                .map(|(_, row)| measure.evaluate(&[*row]).unwrap_or_default())
                .collect();
            TimeAnalysis::Trend(trend(&values, config.trend_threshold))
        }
    }
}

fn period_changes(
    dated: &[(Option<NaiveDateTime>, &Row)],
    measure: &Measure,
    key: impl Fn(&NaiveDateTime) -> String,
) -> Vec<PeriodChange> {
    let mut buckets: BTreeMap<String, Vec<&Row>> = BTreeMap::new();
    for (date, row) in dated {
        if let Some(date) = date {
            buckets.entry(key(date)).or_default().push(*row);
        }
    }
    let values: Vec<(String, Option<f64>)> = buckets
        .into_iter()
        .map(|(period, rows)| {
            let value = measure.evaluate(&rows);
            (period, value)
        })
        .collect();
    values
        .windows(2)
        .map(|pair| {
            let (_, prev) = &pair[0];
            let (period, curr) = &pair[1];
            let change = match (*prev, *curr) {
                (Some(prev), Some(curr)) if prev != 0.0 => (curr - prev) / prev * 100.0,
                _ => 0.0,
            };
            PeriodChange {
                period: period.clone(),
                value: *curr,
                change,
            }
        })
        .collect()
}

fn rolling(rows: &[&Row], measure: &Measure, window: usize) -> Vec<RollingPoint> {
    if window == 0 {
        return Vec::new();
    }
    rows.windows(window)
        .enumerate()
        .map(|(start, slice)| RollingPoint {
            index: start + window - 1,
            value: measure.evaluate(slice),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss, reason = "row positions are small")]
fn trend(values: &[f64], threshold: f64) -> Trend {
    let index: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    let slope = lynx_stats::linear_regression(&index, values).slope;
    let direction = if slope > threshold {
        TrendDirection::Up
    } else if slope < -threshold {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };
    Trend { direction, slope }
}

/// Parses a date cell: text in one of the supported layouts or epoch milliseconds.
fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(ms) => from_millis(*ms),
        Value::Text(text) => parse_date_text(text.trim()),
        Value::Null | Value::Bool(_) => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .or_else(|| text.parse::<f64>().ok().and_then(from_millis))
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "sub-millisecond precision is dropped; out-of-range values are rejected by chrono"
)]
fn from_millis(ms: f64) -> Option<NaiveDateTime> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::Aggregator;

    fn sum_sales() -> Measure {
        Measure::new(Aggregator::Sum, "sales")
    }

    fn monthly() -> Vec<Row> {
        vec![
            Row::new().with("date", "2024-02-10").with("sales", 150.0),
            Row::new().with("date", "2024-01-05").with("sales", 100.0),
            Row::new().with("date", "not a date").with("sales", 999.0),
            Row::new().with("date", "2024-01-20").with("sales", 100.0),
            Row::new().with("date", "2024-03-01T00:00:00Z").with("sales", 0.0),
            Row::new().with("date", "04/15/2024").with("sales", 50.0),
        ]
    }

    #[test]
    fn month_over_month_skips_undated_rows() {
        let rows = monthly();
        let refs: Vec<&Row> = rows.iter().collect();
        let spec = TimeSpec::Mom {
            date_column: "date".into(),
        };
        let TimeAnalysis::Periods(changes) =
            analyze_time(&refs, &spec, &sum_sales(), &EngineConfig::default())
        else {
            panic!("expected periods");
        };
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].period, "2024-02");
        assert_eq!(changes[0].value, Some(150.0));
        assert!((changes[0].change + 25.0).abs() < 1e-9, "200 -> 150 is -25%");
        assert_eq!(changes[1].period, "2024-03");
        assert_eq!(changes[1].change, -100.0);
        // Previous period is zero.
        assert_eq!(changes[2].period, "2024-04");
        assert_eq!(changes[2].change, 0.0);
    }

    #[test]
    fn year_over_year_keys_by_year() {
        let rows = vec![
            Row::new().with("date", "2023/06/01").with("sales", 100.0),
            Row::new().with("date", "2024-06-01 12:00:00").with("sales", 120.0),
            Row::new().with("date", 1_719_792_000_000_i64).with("sales", 30.0),
        ];
        let refs: Vec<&Row> = rows.iter().collect();
        let spec = TimeSpec::Yoy {
            date_column: "date".into(),
        };
        let out = analyze_time(&refs, &spec, &sum_sales(), &EngineConfig::default());
        assert_eq!(
            out,
            TimeAnalysis::Periods(vec![PeriodChange {
                period: "2024".into(),
                value: Some(150.0),
                change: 50.0,
            }])
        );
    }

    #[test]
    fn rolling_is_positional_after_sorting() {
        let rows = monthly();
        let refs: Vec<&Row> = rows.iter().collect();
        let spec = TimeSpec::Rolling {
            date_column: "date".into(),
            window: Some(2),
        };
        let TimeAnalysis::Rolling(points) =
            analyze_time(&refs, &spec, &sum_sales(), &EngineConfig::default())
        else {
            panic!("expected rolling points");
        };
        // Sorted sales: 100, 100, 150, 0, 50, 999 (undated last).
        let values: Vec<Option<f64>> = points.iter().map(|p| p.value).collect();
        assert_eq!(
            values,
            [Some(200.0), Some(250.0), Some(150.0), Some(50.0), Some(1049.0)]
        );
        assert_eq!(points[0].index, 1);

        let spec = TimeSpec::Rolling {
            date_column: "date".into(),
            window: Some(10),
        };
        let out = analyze_time(&refs, &spec, &sum_sales(), &EngineConfig::default());
        assert_eq!(out, TimeAnalysis::Rolling(Vec::new()));
    }

    #[test]
    fn trend_classifies_slope() {
        let rows: Vec<Row> = (0..5)
            .map(|i| {
                Row::new()
                    .with("date", format!("2024-01-{:02}", i + 1))
                    .with("sales", f64::from(i) * 10.0)
            })
            .collect();
        let refs: Vec<&Row> = rows.iter().collect();
        let spec = TimeSpec::Trend {
            date_column: "date".into(),
        };
        let TimeAnalysis::Trend(t) =
            analyze_time(&refs, &spec, &sum_sales(), &EngineConfig::default())
        else {
            panic!("expected trend");
        };
        assert_eq!(t.direction, TrendDirection::Up);
        assert!((t.slope - 10.0).abs() < 1e-9, "slope {}", t.slope);

        assert_eq!(trend(&[5.0, 5.0, 5.0], 0.01).direction, TrendDirection::Stable);
        assert_eq!(trend(&[3.0, 2.0, 1.0], 0.01).direction, TrendDirection::Down);
        assert_eq!(trend(&[], 0.01).slope, 0.0);
    }

    #[test]
    fn spec_deserializes_from_tagged_json() {
        let spec: TimeSpec =
            serde_json::from_str(r#"{"type": "rolling", "dateColumn": "month", "window": 4}"#)
                .unwrap();
        assert_eq!(
            spec,
            TimeSpec::Rolling {
                date_column: "month".into(),
                window: Some(4),
            }
        );
        assert_eq!(spec.date_column(), "month");
    }
}
