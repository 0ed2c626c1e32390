// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rows: flat column-name to value maps.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// A single dataset row.
///
/// A missing column reads the same as a null cell: numerically it is `0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: HashMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a cell, returning the previous value if any.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.cells.insert(column.into(), value.into())
    }

    /// Returns the raw value of a cell, if the column is present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// Returns the coerced numeric value of a cell (`0` when absent or non-numeric).
    pub fn number(&self, column: &str) -> f64 {
        self.get(column).map_or(0.0, Value::to_number)
    }

    /// Returns the number of cells in this row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over `(column, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Extracts one column from a row subset as coerced numbers, preserving row order.
pub fn column_numbers<'a, I>(rows: I, column: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Row>,
{
    rows.into_iter().map(|r| r.number(column)).collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn missing_and_text_cells_read_as_zero() {
        let row = Row::new().with("sales", 120.0).with("region", "East");
        assert_eq!(row.number("sales"), 120.0);
        assert_eq!(row.number("region"), 0.0);
        assert_eq!(row.number("profit"), 0.0);
        assert!(row.get("profit").is_none());
    }

    #[test]
    fn column_numbers_follows_row_order() {
        let rows = vec![
            Row::new().with("x", 3.0),
            Row::new().with("x", "4"),
            Row::new().with("y", 1.0),
        ];
        assert_eq!(column_numbers(&rows, "x"), vec![3.0, 4.0, 0.0]);
    }

    #[test]
    fn deserializes_from_a_json_object() {
        let row: Row = serde_json::from_str(r#"{"sales": 100, "region": "East", "note": null}"#)
            .unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row.get("region"), Some(&Value::from("East")));
        assert_eq!(row.get("note"), Some(&Value::Null));
    }
}
