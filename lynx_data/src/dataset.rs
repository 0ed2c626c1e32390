// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable datasets.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::{Row, Schema};

/// Errors returned when assembling a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// Two schema columns share a name.
    #[error("duplicate column `{0}` in schema")]
    DuplicateColumn(String),
}

/// Rows plus the schema inferred for them.
///
/// A dataset is built once by the ingestion layer and only borrowed afterwards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    schema: Schema,
    rows: Vec<Row>,
}

/// Wire shape of a [`Dataset`], checked by [`Dataset::new`] on the way in.
#[derive(Deserialize)]
struct RawDataset {
    schema: Schema,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = DatasetError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Self::new(raw.schema, raw.rows)
    }
}

impl Dataset {
    /// Creates a dataset, rejecting schemas with repeated column names.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self, DatasetError> {
        {
            let mut seen = HashSet::new();
            for col in &schema.columns {
                if !seen.insert(col.name.as_str()) {
                    return Err(DatasetError::DuplicateColumn(col.name.clone()));
                }
            }
        }
        Ok(Self { schema, rows })
    }

    /// Returns the schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns all rows in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns at most the first `n` rows.
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Returns the row count.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
