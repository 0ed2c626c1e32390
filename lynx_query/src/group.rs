// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping rows by a key tuple and aggregating per group.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use lynx_data::{Row, Value};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::{Measure, MeasureValues};

/// Lookup key: each key column's value as text, `None` for null or missing cells.
type GroupKey = SmallVec<[Option<String>; 4]>;

/// A partition of rows sharing one key tuple.
#[derive(Clone, Debug, PartialEq)]
pub struct Group<'a> {
    /// Key columns with the raw values of the group's first row.
    pub key: Vec<(String, Value)>,
    /// Member rows, in input order.
    pub rows: Vec<&'a Row>,
}

/// Partitions `rows` by the values of `key_columns`.
///
/// Values are compared as text, so `1` and `"1"` share a group, and null and missing cells
/// form a group of their own. Groups are returned in order of first appearance.
pub fn partition<'a>(rows: &[&'a Row], key_columns: &[String]) -> Vec<Group<'a>> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();
    for &row in rows {
        let key: GroupKey = key_columns
            .iter()
            .map(|c| row.get(c).and_then(Value::key_text))
            .collect();
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Group {
                key: key_columns
                    .iter()
                    .map(|c| (c.clone(), row.get(c).cloned().unwrap_or_default()))
                    .collect(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(row);
    }
    groups
}

/// One output row of a grouped query: key columns followed by measure values.
///
/// Serializes as a single flat object, e.g. `{"region": "East", "SUM(sales)": 250.0}`.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupRow {
    /// Key column values.
    pub key: Vec<(String, Value)>,
    /// Measure values keyed by label.
    pub values: MeasureValues,
}

impl GroupRow {
    /// Returns the raw key value for `column`.
    pub fn key_value(&self, column: &str) -> Option<&Value> {
        self.key.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }
}

impl Serialize for GroupRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.key.len() + self.values.len()))?;
        for (column, value) in &self.key {
            map.serialize_entry(column, value)?;
        }
        for (label, value) in self.values.iter() {
            map.serialize_entry(label, &value)?;
        }
        map.end()
    }
}

/// Groups `rows` by `key_columns` and evaluates `measures` for each group.
pub fn group_by(rows: &[&Row], key_columns: &[String], measures: &[Measure]) -> Vec<GroupRow> {
    partition(rows, key_columns)
        .into_iter()
        .map(|group| {
            tracing::trace!(key = ?group.key, rows = group.rows.len(), "group");
            GroupRow {
                values: MeasureValues::evaluate(measures, &group.rows),
                key: group.key,
            }
        })
        .collect()
}
