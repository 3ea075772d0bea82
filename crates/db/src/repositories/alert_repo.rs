//! Repository for the `alerts` table.

use iotm_core::alert::NewAlert;
use sqlx::SqlitePool;

use crate::models::alert::AlertRow;

/// Column list for `alerts` SELECT queries.
const COLUMNS: &str = "id, device_id, timestamp, alert_type, message";

/// Provides query operations for alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a single alert.
    pub async fn insert(pool: &SqlitePool, alert: &NewAlert) -> Result<AlertRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (device_id, timestamp, alert_type, message) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRow>(&query)
            .bind(&alert.device_id)
            .bind(alert.timestamp)
            .bind(alert.alert_type.as_str())
            .bind(&alert.message)
            .fetch_one(pool)
            .await
    }

    /// All alerts for a device, newest first. Ties on timestamp fall back to
    /// insertion order, newest first.
    pub async fn list_by_device(
        pool: &SqlitePool,
        device_id: &str,
    ) -> Result<Vec<AlertRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE device_id = ?1 \
             ORDER BY timestamp DESC, id DESC"
        );
        sqlx::query_as::<_, AlertRow>(&query)
            .bind(device_id)
            .fetch_all(pool)
            .await
    }
}
