// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measures and their canonical `AGG(column)` labels.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use lynx_data::Row;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::{Aggregator, aggregate};

/// Errors returned when parsing a measure expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeasureParseError {
    /// The text is not of the form `AGG(column)`.
    #[error("malformed measure `{0}`, expected AGG(column)")]
    Malformed(String),
    /// The aggregator name is not supported.
    #[error("unknown aggregator `{0}`")]
    UnknownAggregator(String),
}

/// An aggregator applied to a column, e.g. `AVG(profit)`.
///
/// The canonical label (see [`Measure::label`]) is both the display text and the key under
/// which results are reported. Parsing and labelling round-trip: `label(parse(s))` parses back
/// to the same measure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Measure {
    /// Aggregation operation.
    pub agg: Aggregator,
    /// Column to aggregate.
    pub column: String,
}

impl Measure {
    /// Creates a measure.
    pub fn new(agg: Aggregator, column: impl Into<String>) -> Self {
        Self {
            agg,
            column: column.into(),
        }
    }

    /// Canonical `AGG(column)` label with an upper-case aggregator.
    pub fn label(&self) -> String {
        format!("{}({})", self.agg.name(), self.column)
    }

    /// Evaluates this measure over a row subset.
    pub fn evaluate(&self, rows: &[&Row]) -> Option<f64> {
        aggregate(rows, &self.column, self.agg)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.agg.name(), self.column)
    }
}

impl FromStr for Measure {
    type Err = MeasureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MeasureParseError::Malformed(s.into());
        let text = s.trim();
        let (agg, rest) = text.split_once('(').ok_or_else(malformed)?;
        let column = rest.strip_suffix(')').ok_or_else(malformed)?.trim();
        if column.is_empty() || column.contains(['(', ')']) {
            return Err(malformed());
        }
        Ok(Self::new(agg.trim().parse()?, column))
    }
}

impl TryFrom<String> for Measure {
    type Error = MeasureParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Measure> for String {
    fn from(value: Measure) -> Self {
        value.label()
    }
}

/// Measure results keyed by canonical label, in request order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasureValues {
    entries: Vec<(String, Option<f64>)>,
}

impl MeasureValues {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates each measure over `rows`.
    pub fn evaluate(measures: &[Measure], rows: &[&Row]) -> Self {
        let mut out = Self::new();
        for m in measures {
            out.insert(m.label(), m.evaluate(rows));
        }
        out
    }

    /// Sets a value, replacing an existing entry with the same label in place.
    pub fn insert(&mut self, label: String, value: Option<f64>) {
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    /// Returns the entry for `label`: `None` if absent, `Some(None)` for an empty MIN/MAX.
    pub fn get(&self, label: &str) -> Option<Option<f64>> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    /// Returns `true` if `label` has an entry.
    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Iterates over `(label, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), *v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MeasureValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}
