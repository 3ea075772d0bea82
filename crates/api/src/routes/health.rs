use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the admission gate is active.
    pub rate_limit_enabled: bool,
    /// Devices currently holding a token bucket.
    pub tracked_devices: usize,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = iotm_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        rate_limit_enabled: state.admission.is_enabled(),
        tracked_devices: state.admission.store().map_or(0, |s| s.len()),
    })
}

/// Mount the health check route. Not subject to admission control.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
