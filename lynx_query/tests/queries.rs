// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end queries described as JSON, the way the API layer submits them.

use lynx_data::{Dataset, DatasetId, DatasetRepository, InMemoryRepository, Row, Schema};
use lynx_query::{Engine, Query, QueryError, QueryService};
use serde_json::{Value, json};

fn sales() -> Dataset {
    let schema: Schema = serde_json::from_value(json!({
        "columns": [
            {"name": "sales", "type": "integer"},
            {"name": "profit", "type": "integer"},
            {"name": "region", "type": "string"},
            {"name": "month", "type": "string"},
        ]
    }))
    .unwrap();
    let rows: Vec<Row> = serde_json::from_value(json!([
        {"sales": 100, "profit": 20, "region": "East", "month": "Jan"},
        {"sales": 200, "profit": 40, "region": "West", "month": "Jan"},
        {"sales": 150, "profit": 30, "region": "East", "month": "Feb"},
        {"sales": 250, "profit": 50, "region": "West", "month": "Feb"},
        {"sales": 180, "profit": 35, "region": "East", "month": "Mar"},
        {"sales": 220, "profit": 45, "region": "West", "month": "Mar"},
    ]))
    .unwrap();
    Dataset::new(schema, rows).unwrap()
}

fn run(query: Value) -> Value {
    let query: Query = serde_json::from_value(query).unwrap();
    let result = Engine::default().execute(&sales(), &query).unwrap();
    serde_json::to_value(result).unwrap()
}

fn close(v: &Value, expected: f64) -> bool {
    v.as_f64().is_some_and(|x| (x - expected).abs() < 1e-9)
}

#[test]
fn basic_aggregations() {
    let out = run(json!({
        "measures": ["SUM(sales)", "AVG(sales)", "MIN(sales)", "MAX(sales)", "COUNT(sales)"]
    }));
    let m = &out["measures"];
    assert_eq!(m["SUM(sales)"], 1100.0);
    assert!(close(&m["AVG(sales)"], 1100.0 / 6.0), "avg {}", m["AVG(sales)"]);
    assert_eq!(m["MIN(sales)"], 100.0);
    assert_eq!(m["MAX(sales)"], 250.0);
    assert_eq!(m["COUNT(sales)"], 6.0);
    assert!(out.get("groups").is_none(), "no groupBy, no groups");
}

#[test]
fn group_by_region() {
    let out = run(json!({"measures": ["SUM(sales)", "AVG(profit)"], "groupBy": ["region"]}));
    let groups = out["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["region"], "East");
    assert_eq!(groups[0]["SUM(sales)"], 430.0);
    assert!(close(&groups[0]["AVG(profit)"], 85.0 / 3.0));
    assert_eq!(groups[1]["region"], "West");
    assert_eq!(groups[1]["SUM(sales)"], 670.0);
    assert_eq!(groups[1]["AVG(profit)"], 45.0);
}

#[test]
fn range_filter() {
    let out = run(json!({
        "measures": ["SUM(sales)", "COUNT(sales)"],
        "filters": {"sales": {"min": 150}}
    }));
    assert_eq!(out["measures"], json!({"SUM(sales)": 1000.0, "COUNT(sales)": 5.0}));
}

#[test]
fn correlation_and_forecast() {
    let out = run(json!({
        "measures": ["SUM(sales)"],
        "advanced": {
            "correlation": {"xColumn": "sales", "yColumn": "profit"},
            "forecast": {"column": "sales", "periods": 3},
            "notAStatistic": {"column": "sales"}
        }
    }));
    let adv = &out["advanced"];
    assert!(adv["correlation"]["value"].as_f64().unwrap() > 0.99);
    assert_eq!(adv["correlation"]["columns"], json!(["sales", "profit"]));
    assert_eq!(adv["forecast"], json!([244.0, 268.0, 292.0]));
    assert_eq!(adv.as_object().unwrap().len(), 2);
}

#[test]
fn rolling_average_keeps_input_order_for_undated_rows() {
    let out = run(json!({
        "measures": ["AVG(sales)"],
        "timeIntelligence": {"type": "rolling", "dateColumn": "month", "window": 2}
    }));
    assert_eq!(
        out["timeAnalysis"],
        json!([
            {"index": 1, "value": 150.0},
            {"index": 2, "value": 175.0},
            {"index": 3, "value": 200.0},
            {"index": 4, "value": 215.0},
            {"index": 5, "value": 200.0},
        ])
    );
}

#[test]
fn kpi_status() {
    let out = run(json!({
        "measures": ["SUM(sales)"],
        "kpis": [{
            "name": "Total Sales",
            "measure": "SUM(sales)",
            "target": 1000,
            "thresholds": {"yellow": 800, "red": 600}
        }]
    }));
    assert_eq!(
        out["kpis"],
        json!([{"name": "Total Sales", "value": 1100.0, "status": "green", "target": 1000.0}])
    );
}

#[test]
fn histogram() {
    let out = run(json!({"histogram": {"column": "sales", "bins": 5}}));
    let h = &out["histogram"];
    assert_eq!(h["bins"], json!([1, 1, 1, 1, 2]));
    assert_eq!(h["min"], 100.0);
    assert_eq!(h["max"], 250.0);
    assert_eq!(h["binWidth"], 30.0);
    assert_eq!(h["percentiles"], json!({"p50": 180.0, "p90": 250.0, "p99": 250.0}));
}

#[test]
fn service_resolves_datasets_by_id() {
    let mut repo = InMemoryRepository::new();
    repo.insert(DatasetId(7), sales());
    let service = QueryService::new(repo, Engine::default());

    let query: Query = serde_json::from_value(json!({"measures": ["MAX(profit)"]})).unwrap();
    let result = service.execute(DatasetId(7), &query).unwrap();
    assert_eq!(result.measures.get("MAX(profit)"), Some(Some(50.0)));
    assert_eq!(
        service.execute(DatasetId(8), &query),
        Err(QueryError::MissingDataset(DatasetId(8)))
    );

    let request = serde_json::from_value(json!({
        "operation": "seasonality",
        "columns": ["sales"],
        "params": {"period": 2}
    }))
    .unwrap();
    let out = serde_json::to_value(service.advanced(DatasetId(7), &request).unwrap()).unwrap();
    // East rows sit at even positions: mean 430 / 3 over overall mean 1100 / 6.
    let indices = out["indices"].as_array().unwrap();
    assert!(close(&indices[0], (430.0 / 3.0) / (1100.0 / 6.0)));
    assert!(close(&indices[1], (670.0 / 3.0) / (1100.0 / 6.0)));
}
