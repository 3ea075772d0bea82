//! Route definitions for device-scoped operations.
//!
//! Mounted under `/devices`.
//!
//! ```text
//! POST /{device_id}/config     update_config
//! POST /{device_id}/metrics    post_metrics
//! GET  /{device_id}/alerts     get_alerts
//! POST /{device_id}/limiter    set_limiter
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

/// Device routes, mounted at `/devices`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{device_id}/config", post(devices::update_config))
        .route("/{device_id}/metrics", post(devices::post_metrics))
        .route("/{device_id}/alerts", get(devices::get_alerts))
        .route("/{device_id}/limiter", post(devices::set_limiter))
}
