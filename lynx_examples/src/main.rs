// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Example binary for `lynx_query`.
//!
//! Loads a small sales dataset into an in-memory repository and prints the JSON results of a
//! few queries. Set `RUST_LOG=debug` to see the pipeline stages.

use lynx_data::{
    Column, ColumnType, Dataset, DatasetId, DatasetRepository, InMemoryRepository, Row, Schema,
};
use lynx_query::{Engine, EngineConfig, OperationRequest, Query, QueryService};
use serde_json::json;

const SALES: DatasetId = DatasetId(1);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut repository = InMemoryRepository::new();
    repository.insert(SALES, sales_dataset()?);
    let service = QueryService::new(repository, Engine::new(EngineConfig::default()));

    let queries = [
        (
            "group by region",
            json!({"measures": ["SUM(sales)", "AVG(profit)"], "groupBy": ["region"]}),
        ),
        (
            "filtered totals with KPI",
            json!({
                "measures": ["SUM(sales)", "COUNT(sales)"],
                "filters": {"sales": {"min": 150}},
                "kpis": [{
                    "name": "Total Sales",
                    "measure": "SUM(sales)",
                    "target": 1500,
                    "thresholds": {"yellow": 1200, "red": 900}
                }]
            }),
        ),
        (
            "month over month",
            json!({
                "measures": ["SUM(sales)"],
                "timeIntelligence": {"type": "mom", "dateColumn": "date"}
            }),
        ),
        (
            "histogram and advanced statistics",
            json!({
                "histogram": {"column": "sales", "bins": 4},
                "advanced": {
                    "correlation": {"xColumn": "sales", "yColumn": "profit"},
                    "forecast": {"column": "sales"},
                    "rank": "sales"
                }
            }),
        ),
    ];
    for (name, query) in queries {
        let query: Query = serde_json::from_value(query)?;
        let result = service.execute(SALES, &query)?;
        println!("== {name}\n{}", serde_json::to_string_pretty(&result)?);
    }

    let request = OperationRequest::new("statistics", ["profit"]);
    let stats = service.advanced(SALES, &request)?;
    println!("== statistics(profit)\n{}", serde_json::to_string_pretty(&stats)?);

    let matrix = service.correlation_matrix(SALES)?;
    println!("== correlation matrix\n{}", serde_json::to_string_pretty(&matrix)?);

    Ok(())
}

fn sales_dataset() -> Result<Dataset, Box<dyn std::error::Error>> {
    let schema = Schema::new(vec![
        Column::new("date", ColumnType::Date),
        Column::new("region", ColumnType::String),
        Column::new("sales", ColumnType::Integer),
        Column::new("profit", ColumnType::Integer),
    ]);
    let rows = [
        ("2024-01-15", "East", 100, 20),
        ("2024-01-20", "West", 200, 40),
        ("2024-02-11", "East", 150, 30),
        ("2024-02-25", "West", 250, 50),
        ("2024-03-03", "East", 180, 35),
        ("2024-03-18", "West", 220, 45),
    ]
    .into_iter()
    .map(|(date, region, sales, profit)| {
        Row::new()
            .with("date", date)
            .with("region", region)
            .with("sales", sales)
            .with("profit", profit)
    })
    .collect();
    Ok(Dataset::new(schema, rows)?)
}
