// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative analytical queries over Lynx datasets.
//!
//! A [`Query`] describes a fixed pipeline that [`Engine::execute`] runs against a borrowed
//! [`lynx_data::Dataset`]:
//!
//! 1. [`apply_filters`] keeps rows matching every column filter,
//! 2. flat measures are computed over the filtered rows, and [`group_by`] partitions them
//!    when grouping columns are given,
//! 3. optional time intelligence ([`analyze_time`]),
//! 4. KPI status bands ([`evaluate_kpis`]),
//! 5. an optional [`histogram`], and
//! 6. named advanced statistics ([`run_advanced`]).
//!
//! Every stage is also usable on its own. Execution is synchronous and never mutates the
//! dataset, so one dataset can serve any number of concurrent queries.
//!
//! [`QueryService`] layers dataset lookup through a [`lynx_data::DatasetRepository`] on top,
//! along with the single-operation statistics entry point ([`run_operation`]).

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod advanced;
mod aggregate;
mod config;
mod engine;
mod error;
mod filter;
#[cfg(not(feature = "std"))]
mod float;
mod group;
mod histogram;
mod kpi;
mod measure;
mod operation;
mod query;
mod service;
mod time;

pub use advanced::{
    AdvancedResults, AdvancedSpec, ColumnPair, CorrelationResult, Distribution, EmaSpec,
    ForecastSpec, SeasonalitySpec, SmaSpec, run_advanced,
};
pub use aggregate::{Aggregator, aggregate};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::QueryError;
pub use filter::{FilterSpec, Filters, apply_filters};
pub use group::{Group, GroupRow, group_by, partition};
pub use histogram::{Histogram, HistogramPercentiles, HistogramSpec, histogram, nearest_rank_percentile};
pub use kpi::{KpiDef, KpiResult, KpiStatus, Thresholds, evaluate_kpis};
pub use measure::{Measure, MeasureParseError, MeasureValues};
pub use operation::{Operation, OperationOutput, OperationParams, OperationRequest, run_operation};
pub use query::{Query, QueryResult};
pub use service::{ColumnDescription, CorrelationMatrix, MeasureCatalog, QueryService};
pub use time::{
    PeriodChange, RollingPoint, TimeAnalysis, TimeSpec, Trend, TrendDirection, analyze_time,
};
