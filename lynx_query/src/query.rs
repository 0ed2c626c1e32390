// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query descriptors and results.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::config::or_default;
use crate::{
    AdvancedResults, AdvancedSpec, EngineConfig, FilterSpec, Filters, GroupRow, Histogram,
    HistogramSpec, KpiDef, KpiResult, Measure, MeasureValues, QueryError, TimeAnalysis, TimeSpec,
};

/// A declarative analytical query.
///
/// Every part is optional; an empty query returns an empty result. In JSON, field names are
/// camelCase (`groupBy`, `timeIntelligence`) and unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Query {
    /// Per-column row filters, combined with AND.
    pub filters: Filters,
    /// Grouping columns; groups are reported only when non-empty.
    pub group_by: Vec<String>,
    /// Measures, evaluated over the filtered rows and per group.
    pub measures: Vec<Measure>,
    /// Time analysis of the first measure.
    pub time_intelligence: Option<TimeSpec>,
    /// KPI definitions.
    pub kpis: Vec<KpiDef>,
    /// Histogram of one column.
    pub histogram: Option<HistogramSpec>,
    /// Advanced statistics.
    pub advanced: Option<AdvancedSpec>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter on `column`.
    #[must_use]
    pub fn with_filter(mut self, column: impl Into<String>, spec: FilterSpec) -> Self {
        self.filters.insert(column.into(), spec);
        self
    }

    /// Sets the grouping columns.
    #[must_use]
    pub fn with_group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a measure.
    #[must_use]
    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    /// Sets the time analysis.
    #[must_use]
    pub fn with_time_intelligence(mut self, spec: TimeSpec) -> Self {
        self.time_intelligence = Some(spec);
        self
    }

    /// Appends a KPI.
    #[must_use]
    pub fn with_kpi(mut self, kpi: KpiDef) -> Self {
        self.kpis.push(kpi);
        self
    }

    /// Sets the histogram.
    #[must_use]
    pub fn with_histogram(mut self, spec: HistogramSpec) -> Self {
        self.histogram = Some(spec);
        self
    }

    /// Sets the advanced statistics.
    #[must_use]
    pub fn with_advanced(mut self, spec: AdvancedSpec) -> Self {
        self.advanced = Some(spec);
        self
    }

    /// Checks the parts that cannot run as given under `config`.
    pub fn validate(&self, config: &EngineConfig) -> Result<(), QueryError> {
        if let Some(h) = &self.histogram {
            if h.bins == Some(0) {
                return Err(QueryError::InvalidHistogramBins);
            }
            config.bounded("bins", or_default(h.bins, config.histogram_bins))?;
        }
        if self.time_intelligence.is_some() && self.measures.is_empty() {
            return Err(QueryError::MissingTimeMeasure);
        }
        if let Some(advanced) = &self.advanced {
            if let Some(f) = &advanced.forecast {
                config.bounded("periods", or_default(f.periods, config.query_forecast_periods))?;
            }
            if let Some(s) = &advanced.seasonality {
                config.bounded("maxLag", or_default(s.max_lag, config.seasonality_period))?;
            }
        }
        Ok(())
    }
}

/// Output of one query execution.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Measures over all filtered rows, in request order.
    pub measures: MeasureValues,
    /// Per-group measures, present when the query groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupRow>>,
    /// Time analysis, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_analysis: Option<TimeAnalysis>,
    /// KPI results, in definition order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kpis: Vec<KpiResult>,
    /// Histogram, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
    /// Advanced statistics, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedResults>,
}
