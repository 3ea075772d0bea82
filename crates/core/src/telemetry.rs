//! Device configuration and metric reading models.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, DeviceId, Timestamp};

/// Per-device alert thresholds. At most one exists per device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub device_id: DeviceId,
    pub temperature_threshold: f64,
    pub battery_threshold: f64,
}

/// A validated reading that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMetric {
    pub device_id: DeviceId,
    pub timestamp: Timestamp,
    pub temperature: f64,
    pub battery: f64,
}

/// A stored reading. Append-only; never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub id: DbId,
    pub device_id: DeviceId,
    pub timestamp: Timestamp,
    pub temperature: f64,
    pub battery: f64,
}
