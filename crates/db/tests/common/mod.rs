use chrono::{TimeZone, Utc};
use iotm_core::telemetry::{DeviceConfig, NewMetric};
use iotm_db::DbPool;

/// Fresh in-memory database with all migrations applied.
pub async fn migrated_pool() -> DbPool {
    let pool = iotm_db::create_memory_pool().await.unwrap();
    iotm_db::run_migrations(&pool).await.unwrap();
    pool
}

pub fn config(device_id: &str, temperature_threshold: f64, battery_threshold: f64) -> DeviceConfig {
    DeviceConfig {
        device_id: device_id.to_string(),
        temperature_threshold,
        battery_threshold,
    }
}

pub fn reading(device_id: &str, temperature: f64, battery: f64) -> NewMetric {
    NewMetric {
        device_id: device_id.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        temperature,
        battery,
    }
}
