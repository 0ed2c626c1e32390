// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row and schema model for Lynx analytics.
//!
//! This crate owns the data side of a query:
//! - [`Value`] scalars and the lenient numeric coercion rule every measure relies on,
//! - [`Row`]s and the upstream-inferred [`Schema`] bundled into a [`Dataset`], and
//! - the [`DatasetRepository`] seam through which hosts hand datasets to the query layer.
//!
//! Datasets are immutable once built. Query execution only ever borrows them, so a single
//! `Arc<Dataset>` can back any number of concurrent queries.

#![no_std]

extern crate alloc;

mod dataset;
mod repository;
mod row;
mod schema;
mod value;

pub use dataset::{Dataset, DatasetError};
pub use repository::{DatasetId, DatasetRepository, InMemoryRepository};
pub use row::{Row, column_numbers};
pub use schema::{Column, ColumnType, Schema};
pub use value::Value;
