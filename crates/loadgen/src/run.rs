//! Drives the simulated fleet and collects the report.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::StreamExt;
use rand::Rng;
use uuid::Uuid;

use crate::config::LoadConfig;
use crate::error::LoadError;
use crate::http_client::HttpClient;
use crate::report::{Outcome, Report, Summary};
use crate::rpc_client::RpcClient;

/// Thresholds every simulated device configures.
pub const TEMPERATURE_THRESHOLD: f64 = 45.0;
pub const BATTERY_THRESHOLD: f64 = 20.0;

/// A randomised `(temperature, battery)` pair. Roughly a third of the
/// readings cross one of the thresholds.
pub fn random_reading() -> (f64, f64) {
    let mut rng = rand::rng();
    let temperature = rng.random_range(15.0..60.0);
    let battery = rng.random_range(5.0..100.0);
    (temperature, battery)
}

/// Run the whole load test. Fails only if the service is unreachable
/// up front; per-call failures are tallied in the summary.
pub async fn run(config: &LoadConfig) -> Result<Summary, LoadError> {
    let http = HttpClient::new(config.http_url.clone());
    let health = http.health().await?;
    tracing::info!(
        version = %health.version,
        rate_limit_enabled = health.rate_limit_enabled,
        "Service healthy",
    );

    let report = Arc::new(Report::default());
    let started = Instant::now();

    futures::stream::iter((0..config.devices).map(|_| Uuid::new_v4().to_string()))
        .for_each_concurrent(config.concurrency, |device_id| {
            let http = http.clone();
            let report = Arc::clone(&report);
            async move {
                if let Err(e) = drive_device(config, &http, &report, &device_id).await {
                    tracing::warn!(device_id = %device_id, error = %e, "Device session aborted");
                    report.record(Outcome::Failed);
                }
            }
        })
        .await;

    Ok(report.summary(config.devices, started.elapsed()))
}

async fn drive_device(
    config: &LoadConfig,
    http: &HttpClient,
    report: &Report,
    device_id: &str,
) -> Result<(), LoadError> {
    let outcome = http
        .update_config(device_id, TEMPERATURE_THRESHOLD, BATTERY_THRESHOLD)
        .await?;
    report.record(outcome);
    if outcome != Outcome::Accepted {
        tracing::debug!(device_id, ?outcome, "Config not stored, skipping metrics");
        return Ok(());
    }

    let mut rpc = RpcClient::connect(&config.rpc_url).await?;

    for round in 0..config.rounds {
        let (temperature, battery) = random_reading();
        let timestamp = Utc::now();
        let outcome = if round % 2 == 0 {
            http.post_metric(device_id, timestamp, temperature, battery)
                .await
        } else {
            rpc.post_metric(device_id, timestamp, temperature, battery)
                .await
        };
        report.record(outcome.unwrap_or_else(|e| {
            tracing::debug!(device_id, round, error = %e, "Metric post failed");
            Outcome::Failed
        }));
    }

    rpc.close().await;

    let (outcome, alerts) = http.get_alerts(device_id).await?;
    report.record(outcome);
    report.record_alerts(alerts);
    Ok(())
}
