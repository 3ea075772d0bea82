//! Repository for the `metrics` table (append-only time-series).

use iotm_core::telemetry::NewMetric;
use sqlx::SqlitePool;

use crate::models::metric::MetricRow;

/// Column list for `metrics` SELECT queries.
const COLUMNS: &str = "id, device_id, timestamp, temperature, battery";

/// Provides query operations for device readings.
pub struct MetricRepo;

impl MetricRepo {
    /// Insert a single reading.
    ///
    /// Fails with a foreign-key violation when the device has no config.
    pub async fn insert(pool: &SqlitePool, metric: &NewMetric) -> Result<MetricRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO metrics (device_id, timestamp, temperature, battery) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MetricRow>(&query)
            .bind(&metric.device_id)
            .bind(metric.timestamp)
            .bind(metric.temperature)
            .bind(metric.battery)
            .fetch_one(pool)
            .await
    }

    /// All readings for a device in insertion order.
    pub async fn list_by_device(
        pool: &SqlitePool,
        device_id: &str,
    ) -> Result<Vec<MetricRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM metrics WHERE device_id = ?1 ORDER BY id");
        sqlx::query_as::<_, MetricRow>(&query)
            .bind(device_id)
            .fetch_all(pool)
            .await
    }
}
