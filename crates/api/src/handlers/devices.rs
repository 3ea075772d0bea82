//! Handlers for device-scoped HTTP routes.
//!
//! Every handler takes an [`Admitted`] extractor first, so admission is
//! decided before the JSON body is touched.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use iotm_core::alert::Alert;
use iotm_core::pipeline::Ingested;
use iotm_core::telemetry::DeviceConfig;
use iotm_core::validation::{validate_device_id, ConfigInput, LimiterInput, MetricInput};

use crate::error::AppResult;
use crate::middleware::admission::{
    Admitted, GetAlertsOp, PostMetricsOp, SetLimiterOp, UpdateConfigOp,
};
use crate::response::{DataResponse, StatusResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// POST /devices/{device_id}/config
///
/// Insert or replace the device's alert thresholds.
pub async fn update_config(
    State(state): State<AppState>,
    admitted: Admitted<UpdateConfigOp>,
    payload: Result<Json<ConfigInput>, JsonRejection>,
) -> AppResult<Json<DataResponse<DeviceConfig>>> {
    let Json(input) = payload?;
    let config = input.into_config(&admitted.device_id)?;
    let saved = state.devices.update_config(config).await?;
    Ok(Json(DataResponse::ok(saved)))
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// POST /devices/{device_id}/metrics
///
/// Store a reading and evaluate it against the device's thresholds.
pub async fn post_metrics(
    State(state): State<AppState>,
    admitted: Admitted<PostMetricsOp>,
    payload: Result<Json<MetricInput>, JsonRejection>,
) -> AppResult<Json<DataResponse<Ingested>>> {
    let Json(input) = payload?;
    let metric = input.into_metric(&admitted.device_id)?;
    let ingested = state.devices.post_metric(metric).await?;
    Ok(Json(DataResponse::ok(ingested)))
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// GET /devices/{device_id}/alerts
///
/// All alerts for the device, newest first. Unknown devices get an empty list.
pub async fn get_alerts(
    State(state): State<AppState>,
    admitted: Admitted<GetAlertsOp>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    validate_device_id(&admitted.device_id)?;
    let alerts = state.devices.get_alerts(&admitted.device_id).await?;
    Ok(Json(DataResponse::ok(alerts)))
}

// ---------------------------------------------------------------------------
// Admission overrides
// ---------------------------------------------------------------------------

/// POST /devices/{device_id}/limiter
///
/// Replace the device's token bucket with a fresh one. Never rate limited.
pub async fn set_limiter(
    State(state): State<AppState>,
    admitted: Admitted<SetLimiterOp>,
    payload: Result<Json<LimiterInput>, JsonRejection>,
) -> AppResult<Json<StatusResponse>> {
    let Json(input) = payload?;
    let limits = input.into_override(&admitted.device_id)?;
    state.admission.set_override(&admitted.device_id, limits)?;
    Ok(Json(StatusResponse::ok()))
}
