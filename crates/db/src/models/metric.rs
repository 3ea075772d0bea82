//! Row model for the append-only `metrics` table.

use iotm_core::telemetry::Metric;
use iotm_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `metrics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MetricRow {
    pub id: DbId,
    pub device_id: String,
    pub timestamp: Timestamp,
    pub temperature: f64,
    pub battery: f64,
}

impl From<MetricRow> for Metric {
    fn from(row: MetricRow) -> Self {
        Metric {
            id: row.id,
            device_id: row.device_id,
            timestamp: row.timestamp,
            temperature: row.temperature,
            battery: row.battery,
        }
    }
}
