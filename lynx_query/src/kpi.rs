// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! KPI status bands.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::{Measure, MeasureValues};

/// Status band boundaries. Values below `red` are red, below `yellow` are yellow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Upper bound (exclusive) of the yellow band.
    pub yellow: f64,
    /// Upper bound (exclusive) of the red band.
    pub red: f64,
}

/// A named measure checked against thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KpiDef {
    /// Display name.
    pub name: String,
    /// Measure to read.
    pub measure: Measure,
    /// Target value, reported alongside the status.
    pub target: f64,
    /// Status band boundaries.
    pub thresholds: Thresholds,
}

/// KPI status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiStatus {
    /// At or above the yellow threshold.
    Green,
    /// Between the red and yellow thresholds.
    Yellow,
    /// Below the red threshold.
    Red,
    /// The measure had no value.
    Unknown,
}

impl KpiStatus {
    /// Classifies `value` against `thresholds`.
    pub fn classify(value: Option<f64>, thresholds: &Thresholds) -> Self {
        match value {
            None => Self::Unknown,
            Some(v) if v < thresholds.red => Self::Red,
            Some(v) if v < thresholds.yellow => Self::Yellow,
            Some(_) => Self::Green,
        }
    }
}

/// Evaluated KPI.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiResult {
    /// Display name.
    pub name: String,
    /// Measure value, `None` when the measure had no value.
    pub value: Option<f64>,
    /// Status band.
    pub status: KpiStatus,
    /// Target value.
    pub target: f64,
}

/// Evaluates `kpis` against computed measure values, preserving definition order.
///
/// A KPI whose measure is missing from `measures` gets the [`KpiStatus::Unknown`] status.
pub fn evaluate_kpis(measures: &MeasureValues, kpis: &[KpiDef]) -> Vec<KpiResult> {
    kpis.iter()
        .map(|kpi| {
            let label = kpi.measure.label();
            let value = measures.get(&label).flatten();
            if value.is_none() {
                tracing::warn!(kpi = %kpi.name, measure = %label, "KPI measure has no value");
            }
            KpiResult {
                name: kpi.name.clone(),
                value,
                status: KpiStatus::classify(value, &kpi.thresholds),
                target: kpi.target,
            }
        })
        .collect()
}
