//! Threshold-violation alert types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, DeviceId, Timestamp};

/// Which threshold a reading violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Temperature strictly above the configured threshold.
    Temperature,
    /// Battery strictly below the configured threshold.
    Battery,
}

impl AlertType {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::Temperature => "temperature",
            AlertType::Battery => "battery",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(AlertType::Temperature),
            "battery" => Ok(AlertType::Battery),
            other => Err(CoreError::Persistence(format!(
                "unknown alert type '{other}'"
            ))),
        }
    }
}

/// An alert produced by the evaluator, not yet stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAlert {
    pub device_id: DeviceId,
    /// Evaluation time, not the reading's own timestamp.
    pub timestamp: Timestamp,
    pub alert_type: AlertType,
    pub message: String,
}

/// A stored alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub device_id: DeviceId,
    pub timestamp: Timestamp,
    pub alert_type: AlertType,
    pub message: String,
}

/// Message for a temperature violation. Values are rendered with two decimals.
pub fn temperature_message(temperature: f64, threshold: f64) -> String {
    format!("Temperature {temperature:.2} exceeded threshold {threshold:.2}")
}

/// Message for a battery violation. Values are rendered with two decimals.
pub fn battery_message(battery: f64, threshold: f64) -> String {
    format!("Battery {battery:.2} below threshold {threshold:.2}")
}
