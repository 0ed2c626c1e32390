// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row filters.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use lynx_data::{Row, Value};
use serde::{Deserialize, Serialize};

/// A predicate on one column.
///
/// In JSON a filter is either an array of allowed values or an object with optional `min`
/// and `max` bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    /// Keep rows whose raw cell equals one of these values.
    ///
    /// Comparison is on the uncoerced value, so `100` and `"100"` differ. A row missing the
    /// column never matches.
    OneOf(Vec<Value>),
    /// Keep rows whose coerced numeric value lies within the inclusive bounds.
    Range {
        /// Lower bound, unconstrained when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Upper bound, unconstrained when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl FilterSpec {
    /// Builds a membership filter.
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Builds a range filter.
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range { min, max }
    }

    /// Evaluates the predicate against `column` of `row`.
    pub fn matches(&self, row: &Row, column: &str) -> bool {
        match self {
            Self::OneOf(allowed) => row.get(column).is_some_and(|v| allowed.contains(v)),
            Self::Range { min, max } => {
                let v = row.number(column);
                min.is_none_or(|m| v >= m) && max.is_none_or(|m| v <= m)
            }
        }
    }
}

/// Per-column filters; a row must satisfy all of them.
pub type Filters = HashMap<String, FilterSpec>;

/// Returns the rows that satisfy every filter, in their original order.
pub fn apply_filters<'a>(rows: &'a [Row], filters: &Filters) -> Vec<&'a Row> {
    rows.iter()
        .filter(|row| filters.iter().all(|(col, spec)| spec.matches(row, col)))
        .collect()
}
