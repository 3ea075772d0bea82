//! Input DTOs shared by the HTTP and RPC front-ends, and their validation.
//!
//! Every DTO field is optional at the wire level so that a missing field is
//! reported as a validation error rather than a decoding failure. Conversion
//! into a domain type (`into_*`) validates first and never partially applies.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::admission::RateOverride;
use crate::error::CoreError;
use crate::telemetry::{DeviceConfig, NewMetric};
use crate::types::Timestamp;

/// Reject device ids that are empty or whitespace only.
pub fn validate_device_id(device_id: &str) -> Result<(), CoreError> {
    if device_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "device_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn after_unix_epoch(timestamp: &Timestamp) -> Result<(), ValidationError> {
    if *timestamp <= DateTime::<Utc>::UNIX_EPOCH {
        return Err(ValidationError::new("after_unix_epoch")
            .with_message(Cow::from("must be after the Unix epoch")));
    }
    Ok(())
}

/// Flatten validator output into one stable, sorted message.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{field} {message}"),
                None => format!("{field} failed {}", e.code),
            })
        })
        .collect();
    parts.sort();
    parts.join(", ")
}

fn validated<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Body of an UpdateConfig call.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ConfigInput {
    #[validate(required(message = "is required"))]
    pub temperature_threshold: Option<f64>,
    #[validate(required(message = "is required"))]
    pub battery_threshold: Option<f64>,
}

impl ConfigInput {
    pub fn into_config(self, device_id: &str) -> Result<DeviceConfig, CoreError> {
        validate_device_id(device_id)?;
        validated(&self)?;
        match (self.temperature_threshold, self.battery_threshold) {
            (Some(temperature_threshold), Some(battery_threshold)) => Ok(DeviceConfig {
                device_id: device_id.to_string(),
                temperature_threshold,
                battery_threshold,
            }),
            _ => Err(CoreError::Validation("config thresholds are required".into())),
        }
    }
}

/// Body of a PostMetrics call.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MetricInput {
    #[validate(
        required(message = "is required"),
        custom(function = "after_unix_epoch")
    )]
    pub timestamp: Option<Timestamp>,
    #[validate(required(message = "is required"))]
    pub temperature: Option<f64>,
    #[validate(required(message = "is required"))]
    pub battery: Option<f64>,
}

impl MetricInput {
    pub fn into_metric(self, device_id: &str) -> Result<NewMetric, CoreError> {
        validate_device_id(device_id)?;
        validated(&self)?;
        match (self.timestamp, self.temperature, self.battery) {
            (Some(timestamp), Some(temperature), Some(battery)) => Ok(NewMetric {
                device_id: device_id.to_string(),
                timestamp,
                temperature,
                battery,
            }),
            _ => Err(CoreError::Validation("metric fields are required".into())),
        }
    }
}

/// Body of a SetLimiter call.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LimiterInput {
    #[validate(
        required(message = "is required"),
        range(min = 0.0, message = "must not be negative")
    )]
    pub rate: Option<f64>,
    #[validate(
        required(message = "is required"),
        range(min = 0, message = "must not be negative")
    )]
    pub burst: Option<i64>,
}

impl LimiterInput {
    pub fn into_override(self, device_id: &str) -> Result<RateOverride, CoreError> {
        validate_device_id(device_id)?;
        validated(&self)?;
        let (Some(rate), Some(burst)) = (self.rate, self.burst) else {
            return Err(CoreError::Validation("rate and burst are required".into()));
        };
        if !rate.is_finite() {
            return Err(CoreError::Validation("rate must be finite".into()));
        }
        let burst = u32::try_from(burst)
            .map_err(|_| CoreError::Validation(format!("burst {burst} is out of range")))?;
        Ok(RateOverride { rate, burst })
    }
}
