//! In-memory repository used by the unit tests in this crate.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use crate::alert::{Alert, NewAlert};
use crate::error::CoreError;
use crate::repository::{AlertRepository, ConfigRepository, MetricRepository};
use crate::telemetry::{DeviceConfig, Metric, NewMetric};

#[derive(Default)]
pub struct MemoryStore {
    configs: Mutex<HashMap<String, DeviceConfig>>,
    metrics: Mutex<Vec<Metric>>,
    alerts: Mutex<Vec<Alert>>,
    /// Alert writes allowed before every further one fails.
    alert_budget: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn with_config(
        device_id: &str,
        temperature_threshold: f64,
        battery_threshold: f64,
    ) -> Self {
        let store = Self::default();
        store.configs.lock().insert(
            device_id.to_string(),
            DeviceConfig {
                device_id: device_id.to_string(),
                temperature_threshold,
                battery_threshold,
            },
        );
        store
    }

    pub fn fail_alerts_after(&self, writes: usize) {
        *self.alert_budget.lock() = Some(writes);
    }

    pub fn metrics(&self) -> Vec<Metric> {
        self.metrics.lock().clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }
}

pub fn metric(device_id: &str, temperature: f64, battery: f64) -> NewMetric {
    NewMetric {
        device_id: device_id.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        temperature,
        battery,
    }
}

#[async_trait]
impl ConfigRepository for MemoryStore {
    async fn get_config(&self, device_id: &str) -> Result<Option<DeviceConfig>, CoreError> {
        Ok(self.configs.lock().get(device_id).cloned())
    }

    async fn upsert_config(&self, config: &DeviceConfig) -> Result<DeviceConfig, CoreError> {
        self.configs
            .lock()
            .insert(config.device_id.clone(), config.clone());
        Ok(config.clone())
    }
}

#[async_trait]
impl MetricRepository for MemoryStore {
    async fn put_metric(&self, metric: &NewMetric) -> Result<Metric, CoreError> {
        if !self.configs.lock().contains_key(&metric.device_id) {
            return Err(CoreError::ReferentialIntegrity {
                device_id: metric.device_id.clone(),
            });
        }
        let mut metrics = self.metrics.lock();
        let stored = Metric {
            id: metrics.len() as i64 + 1,
            device_id: metric.device_id.clone(),
            timestamp: metric.timestamp,
            temperature: metric.temperature,
            battery: metric.battery,
        };
        metrics.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl AlertRepository for MemoryStore {
    async fn put_alert(&self, alert: &NewAlert) -> Result<Alert, CoreError> {
        if let Some(budget) = self.alert_budget.lock().as_mut() {
            if *budget == 0 {
                return Err(CoreError::Persistence("disk full".into()));
            }
            *budget -= 1;
        }
        let mut alerts = self.alerts.lock();
        let stored = Alert {
            id: alerts.len() as i64 + 1,
            device_id: alert.device_id.clone(),
            timestamp: alert.timestamp,
            alert_type: alert.alert_type,
            message: alert.message.clone(),
        };
        alerts.push(stored.clone());
        Ok(stored)
    }

    async fn list_alerts(&self, device_id: &str) -> Result<Vec<Alert>, CoreError> {
        let mut found: Vec<Alert> = self
            .alerts
            .lock()
            .iter()
            .filter(|a| a.device_id == device_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(found)
    }
}
