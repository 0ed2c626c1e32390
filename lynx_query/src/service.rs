// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataset-addressed entry points over a [`DatasetRepository`].
//!
//! Callers refer to datasets by id; the service resolves the id and hands the engine a
//! borrowed [`Dataset`].

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use lynx_data::{Column, Dataset, DatasetId, DatasetRepository, column_numbers};
use lynx_stats::ColumnSummary;
use serde::Serialize;

use crate::{
    Aggregator, Engine, Measure, OperationOutput, OperationRequest, Query, QueryError,
    QueryResult,
};

/// Pairwise correlations of the numeric columns of a dataset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Column names, in schema order.
    pub columns: Vec<String>,
    /// `matrix[i][j]` is the correlation of `columns[i]` and `columns[j]`.
    pub matrix: Vec<Vec<f64>>,
}

/// Summary statistics of one column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnDescription {
    /// Column name.
    pub column: String,
    /// Statistics.
    #[serde(flatten)]
    pub summary: ColumnSummary,
}

/// Measures available on a dataset.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureCatalog {
    /// Every aggregator applied to every numeric column.
    pub measures: Vec<Measure>,
    /// Numeric column names, in schema order.
    pub numeric_columns: Vec<String>,
}

/// Query entry points that look datasets up by id.
#[derive(Debug)]
pub struct QueryService<R> {
    repository: R,
    engine: Engine,
}

impl<R: DatasetRepository> QueryService<R> {
    /// Creates a service over `repository`.
    pub fn new(repository: R, engine: Engine) -> Self {
        Self { repository, engine }
    }

    /// Returns the repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns the repository for loading or dropping datasets.
    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    /// Returns the engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn dataset(&self, id: DatasetId) -> Result<Arc<Dataset>, QueryError> {
        self.repository.get(id).ok_or_else(|| {
            tracing::warn!(%id, "dataset not found");
            QueryError::MissingDataset(id)
        })
    }

    /// Runs `query` against dataset `id`.
    pub fn execute(&self, id: DatasetId, query: &Query) -> Result<QueryResult, QueryError> {
        let dataset = self.dataset(id)?;
        self.engine.execute(&dataset, query)
    }

    /// Runs `query` against the first rows of dataset `id` only.
    pub fn preview(&self, id: DatasetId, query: &Query) -> Result<QueryResult, QueryError> {
        let dataset = self.dataset(id)?;
        let rows = dataset.head(self.engine.config().preview_rows);
        self.engine.execute_rows(rows, query)
    }

    /// Runs a single-operation request against all rows of dataset `id`.
    pub fn advanced(
        &self,
        id: DatasetId,
        request: &OperationRequest,
    ) -> Result<OperationOutput, QueryError> {
        let dataset = self.dataset(id)?;
        self.engine.run_operation(&dataset, request)
    }

    /// Correlates every pair of numeric columns of dataset `id`.
    pub fn correlation_matrix(&self, id: DatasetId) -> Result<CorrelationMatrix, QueryError> {
        let dataset = self.dataset(id)?;
        let columns: Vec<String> = dataset
            .schema()
            .numeric_columns()
            .into_iter()
            .map(String::from)
            .collect();
        let series: Vec<Vec<f64>> = columns
            .iter()
            .map(|c| column_numbers(dataset.rows(), c))
            .collect();
        Ok(CorrelationMatrix {
            matrix: lynx_stats::correlation_matrix(&series),
            columns,
        })
    }

    /// Summarizes one column of dataset `id`.
    pub fn describe(&self, id: DatasetId, column: &str) -> Result<ColumnDescription, QueryError> {
        let dataset = self.dataset(id)?;
        let values = column_numbers(dataset.rows(), column);
        Ok(ColumnDescription {
            column: column.into(),
            summary: lynx_stats::summary(&values),
        })
    }

    /// Lists every measure that can be built from the numeric columns of dataset `id`.
    pub fn measures(&self, id: DatasetId) -> Result<MeasureCatalog, QueryError> {
        let dataset = self.dataset(id)?;
        let numeric_columns: Vec<String> = dataset
            .schema()
            .numeric_columns()
            .into_iter()
            .map(String::from)
            .collect();
        let measures = numeric_columns
            .iter()
            .flat_map(|c| Aggregator::ALL.into_iter().map(|agg| Measure::new(agg, c.clone())))
            .collect();
        Ok(MeasureCatalog {
            measures,
            numeric_columns,
        })
    }

    /// Lists the string and date columns of dataset `id`.
    pub fn dimensions(&self, id: DatasetId) -> Result<Vec<Column>, QueryError> {
        let dataset = self.dataset(id)?;
        Ok(dataset
            .schema()
            .dimension_columns()
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use lynx_data::{ColumnType, InMemoryRepository, Row, Schema};

    use super::*;
    use crate::EngineConfig;

    const SALES: DatasetId = DatasetId(1);

    fn service(config: EngineConfig) -> QueryService<InMemoryRepository> {
        let schema = Schema::new(vec![
            Column::new("region", ColumnType::String),
            Column::new("month", ColumnType::Date),
            Column::new("sales", ColumnType::Float),
            Column::new("units", ColumnType::Integer),
        ]);
        let rows = (1..=4)
            .map(|i| {
                Row::new()
                    .with("region", if i % 2 == 0 { "West" } else { "East" })
                    .with("month", std::format!("2024-0{i}-01"))
                    .with("sales", f64::from(i) * 100.0)
                    .with("units", i * 2)
            })
            .collect();
        let mut repo = InMemoryRepository::new();
        repo.insert(SALES, Dataset::new(schema, rows).unwrap());
        QueryService::new(repo, Engine::new(config))
    }

    #[test]
    fn unknown_dataset_is_reported() {
        let svc = service(EngineConfig::default());
        assert_eq!(
            svc.execute(DatasetId(9), &Query::new()),
            Err(QueryError::MissingDataset(DatasetId(9)))
        );
        assert!(svc.dimensions(DatasetId(9)).is_err());
    }

    #[test]
    fn preview_limits_rows() {
        let svc = service(EngineConfig::default().with_preview_rows(2));
        let query = Query::new().with_measure("COUNT(sales)".parse().unwrap());
        let full = svc.execute(SALES, &query).unwrap();
        let preview = svc.preview(SALES, &query).unwrap();
        assert_eq!(full.measures.get("COUNT(sales)"), Some(Some(4.0)));
        assert_eq!(preview.measures.get("COUNT(sales)"), Some(Some(2.0)));
    }

    #[test]
    fn catalog_covers_numeric_columns() {
        let svc = service(EngineConfig::default());
        let catalog = svc.measures(SALES).unwrap();
        assert_eq!(catalog.numeric_columns, ["sales", "units"]);
        assert_eq!(catalog.measures.len(), 14);
        assert_eq!(catalog.measures[0].label(), "SUM(sales)");

        let dims = svc.dimensions(SALES).unwrap();
        let names: Vec<&str> = dims.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["region", "month"]);
    }

    #[test]
    fn correlation_matrix_is_symmetric() {
        let svc = service(EngineConfig::default());
        let m = svc.correlation_matrix(SALES).unwrap();
        assert_eq!(m.columns, ["sales", "units"]);
        assert!((m.matrix[0][1] - 1.0).abs() < 1e-12, "{:?}", m.matrix);
        assert_eq!(m.matrix[0][1], m.matrix[1][0]);
    }

    #[test]
    fn describe_flattens_the_summary() {
        let svc = service(EngineConfig::default());
        let d = svc.describe(SALES, "sales").unwrap();
        assert_eq!(d.summary.count, 4);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["column"], "sales");
        assert_eq!(json["mean"], 250.0);
    }

    #[test]
    fn advanced_requests_resolve_the_dataset() {
        let svc = service(EngineConfig::default());
        let out = svc
            .advanced(SALES, &OperationRequest::new("quartiles", ["sales"]))
            .unwrap();
        let OperationOutput::Quartiles(Some(q)) = out else {
            panic!("expected quartiles");
        };
        assert_eq!((q.min, q.q2, q.max), (100.0, 250.0, 400.0));
        assert_eq!(
            svc.advanced(SALES, &OperationRequest::new("pivot", ["sales"])),
            Err(QueryError::InvalidOperation("pivot".into()))
        );
    }
}
