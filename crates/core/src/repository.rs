//! Storage seams between the domain logic and a concrete backend.
//!
//! Implementations map their own failures onto [`CoreError::Persistence`],
//! and onto [`CoreError::ReferentialIntegrity`] when a write references a
//! device with no configuration.

use async_trait::async_trait;

use crate::alert::{Alert, NewAlert};
use crate::error::CoreError;
use crate::telemetry::{DeviceConfig, Metric, NewMetric};

#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Fetch the configuration for a device, `None` if it was never set.
    async fn get_config(&self, device_id: &str) -> Result<Option<DeviceConfig>, CoreError>;

    /// Insert or fully replace the configuration for `config.device_id`.
    async fn upsert_config(&self, config: &DeviceConfig) -> Result<DeviceConfig, CoreError>;
}

#[async_trait]
pub trait MetricRepository: Send + Sync {
    async fn put_metric(&self, metric: &NewMetric) -> Result<Metric, CoreError>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn put_alert(&self, alert: &NewAlert) -> Result<Alert, CoreError>;

    /// All alerts for a device, newest first.
    async fn list_alerts(&self, device_id: &str) -> Result<Vec<Alert>, CoreError>;
}
