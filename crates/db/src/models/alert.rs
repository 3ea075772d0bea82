//! Row model for the `alerts` table.
//!
//! `alert_type` is stored as text and parsed back into [`AlertType`] on read.

use iotm_core::alert::{Alert, AlertType};
use iotm_core::error::CoreError;
use iotm_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertRow {
    pub id: DbId,
    pub device_id: String,
    pub timestamp: Timestamp,
    pub alert_type: String,
    pub message: String,
}

impl TryFrom<AlertRow> for Alert {
    type Error = CoreError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        Ok(Alert {
            id: row.id,
            device_id: row.device_id,
            timestamp: row.timestamp,
            alert_type: row.alert_type.parse::<AlertType>()?,
            message: row.message,
        })
    }
}
