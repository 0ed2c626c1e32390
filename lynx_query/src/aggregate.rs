// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aggregation functions over a row subset.

use core::fmt;
use core::str::FromStr;

use lynx_data::{Row, column_numbers};

use crate::MeasureParseError;

/// Aggregation operation applied to one column.
///
/// All operations read cells through the numeric coercion rule, so missing and non-numeric
/// cells count as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregator {
    /// Sum of values (`0` when empty).
    Sum,
    /// Number of rows.
    Count,
    /// Mean value (`0` when empty).
    Avg,
    /// Minimum value (`None` when empty).
    Min,
    /// Maximum value (`None` when empty).
    Max,
    /// Population variance (`0` when empty).
    Variance,
    /// Population standard deviation (`0` when empty).
    StdDev,
}

impl Aggregator {
    /// Every aggregator, in display order.
    pub const ALL: [Self; 7] = [
        Self::Sum,
        Self::Count,
        Self::Avg,
        Self::Min,
        Self::Max,
        Self::Variance,
        Self::StdDev,
    ];

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sum => "SUM",
            Self::Count => "COUNT",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Variance => "VARIANCE",
            Self::StdDev => "STDDEV",
        }
    }

    /// Applies this aggregator to already-coerced values.
    ///
    /// Only `MIN` and `MAX` can return `None`, and only for an empty input.
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Sum => Some(lynx_stats::sum(values)),
            Self::Count => Some(values.len() as f64),
            Self::Avg => Some(lynx_stats::mean(values)),
            Self::Min => values.iter().copied().reduce(f64::min),
            Self::Max => values.iter().copied().reduce(f64::max),
            Self::Variance => Some(lynx_stats::variance(values)),
            Self::StdDev => Some(lynx_stats::std_dev(values)),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aggregator {
    type Err = MeasureParseError;

    /// Parses an aggregator name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MeasureParseError::UnknownAggregator(s.into()))
    }
}

/// Aggregates one column of `rows`.
pub fn aggregate(rows: &[&Row], column: &str, agg: Aggregator) -> Option<f64> {
    let values = column_numbers(rows.iter().copied(), column);
    agg.apply(&values)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("sales", 100.0),
            Row::new().with("sales", 200.0),
            Row::new().with("sales", "oops"),
            Row::new(),
        ]
    }

    #[test]
    fn aggregates_coerce_bad_cells_to_zero() {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        assert_eq!(aggregate(&refs, "sales", Aggregator::Count), Some(4.0));
        assert_eq!(aggregate(&refs, "sales", Aggregator::Sum), Some(300.0));
        assert_eq!(aggregate(&refs, "sales", Aggregator::Avg), Some(75.0));
        assert_eq!(aggregate(&refs, "sales", Aggregator::Min), Some(0.0));
        assert_eq!(aggregate(&refs, "sales", Aggregator::Max), Some(200.0));
        // mean 75: deviations 25, 125, -75, -75 -> (625 + 15625 + 5625 + 5625) / 4
        assert_eq!(aggregate(&refs, "sales", Aggregator::Variance), Some(6875.0));
    }

    #[test]
    fn empty_subset_guards() {
        let none: [&Row; 0] = [];
        assert_eq!(aggregate(&none, "sales", Aggregator::Count), Some(0.0));
        assert_eq!(aggregate(&none, "sales", Aggregator::Sum), Some(0.0));
        assert_eq!(aggregate(&none, "sales", Aggregator::Avg), Some(0.0));
        assert_eq!(aggregate(&none, "sales", Aggregator::Variance), Some(0.0));
        assert_eq!(aggregate(&none, "sales", Aggregator::StdDev), Some(0.0));
        // Empty MIN/MAX are detectable rather than infinite.
        assert_eq!(aggregate(&none, "sales", Aggregator::Min), None);
        assert_eq!(aggregate(&none, "sales", Aggregator::Max), None);
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("stddev".parse::<Aggregator>(), Ok(Aggregator::StdDev));
        assert_eq!("Avg".parse::<Aggregator>(), Ok(Aggregator::Avg));
        assert!("MEDIAN".parse::<Aggregator>().is_err());
        for a in Aggregator::ALL {
            assert_eq!(a.name().parse::<Aggregator>(), Ok(a));
        }
    }
}
