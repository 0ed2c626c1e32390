// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::string::String;

use lynx_data::DatasetId;

use crate::MeasureParseError;

/// Errors reported to callers of the query layer.
///
/// Degenerate numeric input is never an error: every statistic has a defined fallback.
/// Missing columns are not errors either; they read as zeros.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A single-operation request named an unsupported operation.
    #[error("unknown operation: {0}")]
    InvalidOperation(String),
    /// The repository has no dataset under this id.
    #[error("dataset {0} not found")]
    MissingDataset(DatasetId),
    /// A measure expression could not be parsed.
    #[error(transparent)]
    InvalidMeasure(#[from] MeasureParseError),
    /// A histogram was requested with zero bins.
    #[error("histogram bins must be positive")]
    InvalidHistogramBins,
    /// Time intelligence needs a measure to evaluate per period.
    #[error("time intelligence requires at least one measure")]
    MissingTimeMeasure,
    /// A request asked for more output elements than the engine allows.
    #[error("{name} = {value} exceeds the limit of {max}")]
    ParameterTooLarge {
        /// Parameter name as written in the request.
        name: &'static str,
        /// Requested value.
        value: usize,
        /// Configured limit.
        max: usize,
    },
}
