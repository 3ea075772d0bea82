//! SQLite-backed implementation of the core repository traits.

use async_trait::async_trait;
use iotm_core::alert::{Alert, NewAlert};
use iotm_core::error::CoreError;
use iotm_core::repository::{AlertRepository, ConfigRepository, MetricRepository};
use iotm_core::telemetry::{DeviceConfig, Metric, NewMetric};

use crate::repositories::{AlertRepo, DeviceConfigRepo, MetricRepo};
use crate::DbPool;

/// Repository adapter over a [`DbPool`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DbStore {
    pool: DbPool,
}

impl DbStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error into the domain vocabulary.
///
/// Foreign-key violations mean the device has no configuration row; every
/// other failure is reported as a persistence error.
pub fn classify_sqlx_error(err: sqlx::Error, device_id: &str) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return CoreError::ReferentialIntegrity {
                device_id: device_id.to_string(),
            };
        }
    }
    tracing::error!(error = %err, device_id, "Database error");
    CoreError::Persistence(err.to_string())
}

#[async_trait]
impl ConfigRepository for DbStore {
    async fn get_config(&self, device_id: &str) -> Result<Option<DeviceConfig>, CoreError> {
        DeviceConfigRepo::find_by_device(&self.pool, device_id)
            .await
            .map(|row| row.map(DeviceConfig::from))
            .map_err(|e| classify_sqlx_error(e, device_id))
    }

    async fn upsert_config(&self, config: &DeviceConfig) -> Result<DeviceConfig, CoreError> {
        DeviceConfigRepo::upsert(&self.pool, config)
            .await
            .map(DeviceConfig::from)
            .map_err(|e| classify_sqlx_error(e, &config.device_id))
    }
}

#[async_trait]
impl MetricRepository for DbStore {
    async fn put_metric(&self, metric: &NewMetric) -> Result<Metric, CoreError> {
        MetricRepo::insert(&self.pool, metric)
            .await
            .map(Metric::from)
            .map_err(|e| classify_sqlx_error(e, &metric.device_id))
    }
}

#[async_trait]
impl AlertRepository for DbStore {
    async fn put_alert(&self, alert: &NewAlert) -> Result<Alert, CoreError> {
        let row = AlertRepo::insert(&self.pool, alert)
            .await
            .map_err(|e| classify_sqlx_error(e, &alert.device_id))?;
        Alert::try_from(row)
    }

    async fn list_alerts(&self, device_id: &str) -> Result<Vec<Alert>, CoreError> {
        AlertRepo::list_by_device(&self.pool, device_id)
            .await
            .map_err(|e| classify_sqlx_error(e, device_id))?
            .into_iter()
            .map(Alert::try_from)
            .collect()
    }
}
