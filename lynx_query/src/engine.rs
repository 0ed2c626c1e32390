// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query execution.

extern crate alloc;

use alloc::vec::Vec;

use lynx_data::{Dataset, Row};
use tracing::debug;

use crate::config::or_default;
use crate::{
    EngineConfig, MeasureValues, OperationOutput, OperationRequest, Query, QueryError,
    QueryResult, analyze_time, apply_filters, evaluate_kpis, group_by, run_advanced, run_operation,
};

/// Executes queries against borrowed datasets.
///
/// The engine holds only configuration, so one instance can serve any number of datasets
/// and threads.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the given defaults.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine defaults.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs `query` against `dataset`.
    #[tracing::instrument(level = "debug", skip_all, fields(rows = dataset.len()))]
    pub fn execute(&self, dataset: &Dataset, query: &Query) -> Result<QueryResult, QueryError> {
        self.execute_rows(dataset.rows(), query)
    }

    /// Runs `query` against a row slice.
    ///
    /// Stages run in a fixed order: filter, measures and groups, time analysis, KPIs,
    /// histogram, advanced statistics. Every stage after filtering sees the same filtered
    /// rows.
    pub fn execute_rows(&self, rows: &[Row], query: &Query) -> Result<QueryResult, QueryError> {
        query.validate(&self.config)?;

        let filtered = apply_filters(rows, &query.filters);
        debug!(before = rows.len(), after = filtered.len(), "filtered rows");

        let measures = MeasureValues::evaluate(&query.measures, &filtered);

        let groups = (!query.group_by.is_empty()).then(|| {
            let groups = group_by(&filtered, &query.group_by, &query.measures);
            debug!(groups = groups.len(), "grouped rows");
            groups
        });

        let time_analysis = match (&query.time_intelligence, query.measures.first()) {
            (Some(spec), Some(measure)) => {
                debug!(?spec, measure = %measure, "time intelligence");
                Some(analyze_time(&filtered, spec, measure, &self.config))
            }
            (Some(_), None) => return Err(QueryError::MissingTimeMeasure),
            (None, _) => None,
        };

        let kpis = if query.kpis.is_empty() {
            Vec::new()
        } else {
            let mut available = measures.clone();
            for kpi in &query.kpis {
                let label = kpi.measure.label();
                if !available.contains(&label) {
                    available.insert(label, kpi.measure.evaluate(&filtered));
                }
            }
            evaluate_kpis(&available, &query.kpis)
        };

        let histogram = query.histogram.as_ref().map(|spec| {
            let bins = or_default(spec.bins, self.config.histogram_bins);
            debug!(column = %spec.column, bins, "histogram");
            crate::histogram(&filtered, &spec.column, bins)
        });

        let advanced = query
            .advanced
            .as_ref()
            .map(|spec| run_advanced(&filtered, spec, &self.config));

        Ok(QueryResult {
            measures,
            groups,
            time_analysis,
            kpis,
            histogram,
            advanced,
        })
    }

    /// Runs a single-operation request over all of `dataset`.
    pub fn run_operation(
        &self,
        dataset: &Dataset,
        request: &OperationRequest,
    ) -> Result<OperationOutput, QueryError> {
        run_operation(dataset.rows(), request, &self.config)
    }
}
