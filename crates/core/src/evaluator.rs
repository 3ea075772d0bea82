//! Threshold evaluation for incoming readings.
//!
//! [`threshold_alerts`] is the pure rule; [`AlertEvaluator`] binds it to
//! storage, looking up the device's configuration and persisting each
//! violation in order.

use std::sync::Arc;

use chrono::Utc;

use crate::alert::{self, Alert, AlertType, NewAlert};
use crate::error::CoreError;
use crate::log_categories;
use crate::repository::{AlertRepository, ConfigRepository};
use crate::telemetry::{DeviceConfig, NewMetric};
use crate::types::Timestamp;

/// Compare a reading against a configuration.
///
/// Temperature is checked before battery; both comparisons are strict, so a
/// reading exactly at a threshold raises nothing.
pub fn threshold_alerts(
    config: &DeviceConfig,
    metric: &NewMetric,
    now: Timestamp,
) -> Vec<NewAlert> {
    let mut alerts = Vec::new();

    if metric.temperature > config.temperature_threshold {
        alerts.push(NewAlert {
            device_id: config.device_id.clone(),
            timestamp: now,
            alert_type: AlertType::Temperature,
            message: alert::temperature_message(metric.temperature, config.temperature_threshold),
        });
    }

    if metric.battery < config.battery_threshold {
        alerts.push(NewAlert {
            device_id: config.device_id.clone(),
            timestamp: now,
            alert_type: AlertType::Battery,
            message: alert::battery_message(metric.battery, config.battery_threshold),
        });
    }

    alerts
}

/// Evaluates readings against stored configuration and stores the alerts.
#[derive(Clone)]
pub struct AlertEvaluator {
    configs: Arc<dyn ConfigRepository>,
    alerts: Arc<dyn AlertRepository>,
}

impl AlertEvaluator {
    pub fn new(configs: Arc<dyn ConfigRepository>, alerts: Arc<dyn AlertRepository>) -> Self {
        Self { configs, alerts }
    }

    /// Evaluate `metric` for `device_id` and persist any violations.
    ///
    /// A device without configuration yields no alerts. Alerts are written
    /// one at a time; the first failed write is returned and later alerts
    /// are not attempted, while earlier ones stay stored.
    pub async fn evaluate(
        &self,
        device_id: &str,
        metric: &NewMetric,
    ) -> Result<Vec<Alert>, CoreError> {
        let Some(config) = self.configs.get_config(device_id).await? else {
            tracing::debug!(
                category = log_categories::ALERT,
                device_id,
                "No config for device, skipping alert evaluation",
            );
            return Ok(Vec::new());
        };

        let candidates = threshold_alerts(&config, metric, Utc::now());
        let mut stored = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            tracing::info!(
                category = log_categories::ALERT,
                device_id,
                alert_type = %candidate.alert_type,
                message = %candidate.message,
                "Alert found",
            );
            let saved = self.alerts.put_alert(&candidate).await?;
            tracing::info!(
                category = log_categories::ALERT,
                device_id,
                alert_id = saved.id,
                "Alert saved",
            );
            stored.push(saved);
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::test_support::{metric, MemoryStore};

    fn config(temperature_threshold: f64, battery_threshold: f64) -> DeviceConfig {
        DeviceConfig {
            device_id: "sensor-1".to_string(),
            temperature_threshold,
            battery_threshold,
        }
    }

    fn evaluator(store: &Arc<MemoryStore>) -> AlertEvaluator {
        AlertEvaluator::new(store.clone(), store.clone())
    }

    #[test]
    fn reading_within_limits_raises_nothing() {
        let alerts = threshold_alerts(
            &config(50.0, 10.0),
            &metric("sensor-1", 40.0, 60.0),
            Utc::now(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn thresholds_are_strict() {
        let alerts = threshold_alerts(
            &config(50.0, 10.0),
            &metric("sensor-1", 50.0, 10.0),
            Utc::now(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn temperature_is_reported_before_battery() {
        let now = Utc::now();
        let alerts = threshold_alerts(&config(50.0, 10.0), &metric("sensor-1", 55.0, 5.0), now);

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].alert_type, AlertType::Temperature);
        assert_eq!(alerts[0].message, "Temperature 55.00 exceeded threshold 50.00");
        assert_eq!(alerts[1].alert_type, AlertType::Battery);
        assert_eq!(alerts[1].message, "Battery 5.00 below threshold 10.00");
        assert!(alerts.iter().all(|a| a.timestamp == now));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let now = Utc::now();
        let config = config(30.0, 20.0);
        let reading = metric("sensor-1", 35.0, 15.0);

        let first = threshold_alerts(&config, &reading, now);
        let second = threshold_alerts(&config, &reading, now);

        assert_eq!(first, second);
        assert_eq!(first[0].message, "Temperature 35.00 exceeded threshold 30.00");
        assert_eq!(first[1].message, "Battery 15.00 below threshold 20.00");
    }

    #[test]
    fn nan_reading_raises_nothing() {
        let alerts = threshold_alerts(
            &config(50.0, 10.0),
            &metric("sensor-1", f64::NAN, f64::NAN),
            Utc::now(),
        );
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_device_yields_no_alerts() {
        let store = Arc::new(MemoryStore::default());
        let alerts = evaluator(&store)
            .evaluate("ghost", &metric("ghost", 500.0, 0.0))
            .await
            .unwrap();

        assert!(alerts.is_empty());
        assert!(store.alerts().is_empty());
    }

    #[tokio::test]
    async fn violations_are_persisted_in_order() {
        let store = Arc::new(MemoryStore::with_config("sensor-1", 50.0, 10.0));
        let alerts = evaluator(&store)
            .evaluate("sensor-1", &metric("sensor-1", 55.0, 5.0))
            .await
            .unwrap();

        assert_eq!(alerts.len(), 2);
        let stored = store.alerts();
        assert_eq!(stored[0].alert_type, AlertType::Temperature);
        assert_eq!(stored[1].alert_type, AlertType::Battery);
    }

    #[tokio::test]
    async fn first_failed_write_stops_evaluation() {
        let store = Arc::new(MemoryStore::with_config("sensor-1", 50.0, 10.0));
        store.fail_alerts_after(1);

        let result = evaluator(&store)
            .evaluate("sensor-1", &metric("sensor-1", 55.0, 5.0))
            .await;

        assert_matches!(result, Err(CoreError::Persistence(_)));
        let stored = store.alerts();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].alert_type, AlertType::Temperature);
    }
}
