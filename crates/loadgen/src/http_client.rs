//! Thin HTTP client for the device routes.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::LoadError;
use crate::report::Outcome;

/// Subset of `GET /health` the load generator cares about.
#[derive(Debug, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub rate_limit_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn device_url(&self, device_id: &str, path: &str) -> String {
        format!("{}/devices/{device_id}/{path}", self.base_url)
    }

    /// Fails unless the service reports `ok`.
    pub async fn health(&self) -> Result<Health, LoadError> {
        let health: Health = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if health.status != "ok" {
            return Err(LoadError::Unhealthy(health.status));
        }
        Ok(health)
    }

    pub async fn update_config(
        &self,
        device_id: &str,
        temperature_threshold: f64,
        battery_threshold: f64,
    ) -> Result<Outcome, LoadError> {
        let body = json!({
            "temperature_threshold": temperature_threshold,
            "battery_threshold": battery_threshold,
        });
        let response = self
            .client
            .post(self.device_url(device_id, "config"))
            .json(&body)
            .send()
            .await?;
        Ok(classify(response).await?.0)
    }

    pub async fn post_metric(
        &self,
        device_id: &str,
        timestamp: DateTime<Utc>,
        temperature: f64,
        battery: f64,
    ) -> Result<Outcome, LoadError> {
        let body = json!({
            "timestamp": timestamp,
            "temperature": temperature,
            "battery": battery,
        });
        let response = self
            .client
            .post(self.device_url(device_id, "metrics"))
            .json(&body)
            .send()
            .await?;
        Ok(classify(response).await?.0)
    }

    /// Returns the outcome and the number of alerts listed.
    pub async fn get_alerts(&self, device_id: &str) -> Result<(Outcome, u64), LoadError> {
        let response = self
            .client
            .get(self.device_url(device_id, "alerts"))
            .send()
            .await?;
        let (outcome, body) = classify(response).await?;
        let count = body
            .as_ref()
            .and_then(|b| b.get("data"))
            .and_then(Value::as_array)
            .map_or(0, |alerts| alerts.len() as u64);
        Ok((outcome, count))
    }
}

/// Rate-limited responses carry no body, so the envelope is optional.
async fn classify(response: reqwest::Response) -> Result<(Outcome, Option<Value>), LoadError> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;
    let body: Option<Value> = serde_json::from_slice(&bytes).ok();
    let success = body
        .as_ref()
        .and_then(|b| b.get("success"))
        .and_then(Value::as_bool);
    Ok((Outcome::from_http(status, success), body))
}
