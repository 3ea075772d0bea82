//! Device-facing operations shared by both front-ends.
//!
//! Callers run admission and input validation first; this layer only sees
//! validated domain values.

use std::sync::Arc;

use crate::alert::Alert;
use crate::error::CoreError;
use crate::evaluator::AlertEvaluator;
use crate::log_categories;
use crate::pipeline::{Ingested, IngestionPipeline};
use crate::repository::{AlertRepository, ConfigRepository, MetricRepository};
use crate::telemetry::{DeviceConfig, NewMetric};

#[derive(Clone)]
pub struct DeviceService {
    configs: Arc<dyn ConfigRepository>,
    alerts: Arc<dyn AlertRepository>,
    pipeline: IngestionPipeline,
}

impl DeviceService {
    /// Wire every seam to one backend that implements all three repositories.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ConfigRepository + MetricRepository + AlertRepository + 'static,
    {
        let evaluator = AlertEvaluator::new(store.clone(), store.clone());
        Self {
            configs: store.clone(),
            alerts: store.clone(),
            pipeline: IngestionPipeline::new(store, Some(evaluator)),
        }
    }

    pub fn new(
        configs: Arc<dyn ConfigRepository>,
        alerts: Arc<dyn AlertRepository>,
        pipeline: IngestionPipeline,
    ) -> Self {
        Self {
            configs,
            alerts,
            pipeline,
        }
    }

    pub async fn update_config(&self, config: DeviceConfig) -> Result<DeviceConfig, CoreError> {
        tracing::info!(
            category = log_categories::CONFIG,
            device_id = %config.device_id,
            temperature_threshold = config.temperature_threshold,
            battery_threshold = config.battery_threshold,
            "Received config for device",
        );
        let saved = self.configs.upsert_config(&config).await?;
        tracing::info!(
            category = log_categories::CONFIG,
            device_id = %saved.device_id,
            "Upserted config for device",
        );
        Ok(saved)
    }

    pub async fn post_metric(&self, metric: NewMetric) -> Result<Ingested, CoreError> {
        self.pipeline.ingest(&metric).await
    }

    pub async fn get_alerts(&self, device_id: &str) -> Result<Vec<Alert>, CoreError> {
        self.alerts.list_alerts(device_id).await
    }
}
