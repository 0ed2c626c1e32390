// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column descriptors produced by the upstream parser.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// Inferred column type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Whole numbers.
    Integer,
    /// Floating point numbers.
    Float,
    /// Free text.
    String,
    /// Date-like strings.
    Date,
}

impl ColumnType {
    /// Returns `true` for columns that can back a measure.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Returns `true` for columns usable as grouping dimensions.
    pub fn is_dimension(self) -> bool {
        matches!(self, Self::String | Self::Date)
    }
}

/// A single column descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its schema.
    pub name: String,
    /// Inferred type.
    #[serde(rename = "type")]
    pub ty: ColumnType,
    /// Whether any row holds a null for this column.
    #[serde(default)]
    pub nullable: bool,
}

impl Column {
    /// Creates a non-nullable column.
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
        }
    }

    /// Sets nullability.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Ordered column descriptors for a dataset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Columns in source order.
    pub columns: Vec<Column>,
}

impl Schema {
    /// Creates a schema from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of integer and float columns, in schema order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.ty.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// String and date columns, in schema order.
    pub fn dimension_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.ty.is_dimension()).collect()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn sales_schema() -> Schema {
        Schema::new(vec![
            Column::new("date", ColumnType::Date),
            Column::new("region", ColumnType::String),
            Column::new("units", ColumnType::Integer),
            Column::new("sales", ColumnType::Float).with_nullable(true),
        ])
    }

    #[test]
    fn splits_numeric_and_dimension_columns() {
        let schema = sales_schema();
        assert_eq!(schema.numeric_columns(), vec!["units", "sales"]);
        let dims: Vec<&str> = schema
            .dimension_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(dims, vec!["date", "region"]);
        assert!(schema.column("sales").unwrap().nullable);
        assert!(schema.column("profit").is_none());
    }

    #[test]
    fn reads_upstream_json_shape() {
        let schema: Schema = serde_json::from_str(
            r#"{"columns":[{"name":"sales","type":"float","nullable":false},{"name":"region","type":"string"}]}"#,
        )
        .unwrap();
        assert_eq!(schema.columns[0].ty, ColumnType::Float);
        assert_eq!(schema.columns[1].ty, ColumnType::String);
        assert!(!schema.columns[1].nullable);
    }
}
