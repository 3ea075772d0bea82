//! Repository for the `device_configs` table.

use iotm_core::telemetry::DeviceConfig;
use sqlx::SqlitePool;

use crate::models::device_config::DeviceConfigRow;

/// Column list for `device_configs` SELECT queries.
const COLUMNS: &str = "device_id, temperature_threshold, battery_threshold";

/// Provides query operations for device configurations.
pub struct DeviceConfigRepo;

impl DeviceConfigRepo {
    /// Find the configuration for a device, `None` if absent.
    pub async fn find_by_device(
        pool: &SqlitePool,
        device_id: &str,
    ) -> Result<Option<DeviceConfigRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_configs WHERE device_id = ?1");
        sqlx::query_as::<_, DeviceConfigRow>(&query)
            .bind(device_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a configuration or replace both thresholds of an existing one.
    pub async fn upsert(
        pool: &SqlitePool,
        config: &DeviceConfig,
    ) -> Result<DeviceConfigRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO device_configs (device_id, temperature_threshold, battery_threshold) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT (device_id) DO UPDATE SET \
                temperature_threshold = excluded.temperature_threshold, \
                battery_threshold = excluded.battery_threshold, \
                updated_at = CURRENT_TIMESTAMP \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceConfigRow>(&query)
            .bind(&config.device_id)
            .bind(config.temperature_threshold)
            .bind(config.battery_threshold)
            .fetch_one(pool)
            .await
    }

    /// Number of configured devices.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM device_configs")
            .fetch_one(pool)
            .await
    }
}
