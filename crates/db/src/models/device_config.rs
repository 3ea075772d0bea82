//! Row model for the `device_configs` table.

use iotm_core::telemetry::DeviceConfig;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `device_configs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceConfigRow {
    pub device_id: String,
    pub temperature_threshold: f64,
    pub battery_threshold: f64,
}

impl From<DeviceConfigRow> for DeviceConfig {
    fn from(row: DeviceConfigRow) -> Self {
        DeviceConfig {
            device_id: row.device_id,
            temperature_threshold: row.temperature_threshold,
            battery_threshold: row.battery_threshold,
        }
    }
}
