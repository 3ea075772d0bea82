//! Admission gate extractor for device-scoped routes.
//!
//! Place [`Admitted`] ahead of any body extractor. Axum runs request-parts
//! extractors first, so a throttled request is rejected with 429 before its
//! body is decoded or validated.

use std::marker::PhantomData;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use iotm_core::admission::Operation;

use crate::error::AppError;
use crate::state::AppState;

/// Type-level tag naming the operation a route serves.
pub trait GatedOperation: Send + Sync + 'static {
    const OPERATION: Operation;
}

pub struct UpdateConfigOp;
pub struct PostMetricsOp;
pub struct GetAlertsOp;
pub struct SetLimiterOp;

impl GatedOperation for UpdateConfigOp {
    const OPERATION: Operation = Operation::UpdateConfig;
}

impl GatedOperation for PostMetricsOp {
    const OPERATION: Operation = Operation::PostMetrics;
}

impl GatedOperation for GetAlertsOp {
    const OPERATION: Operation = Operation::GetAlerts;
}

impl GatedOperation for SetLimiterOp {
    const OPERATION: Operation = Operation::SetLimiter;
}

/// The `{device_id}` path segment of a call the admission gate let through.
///
/// Whether the gate is consulted at all is decided by
/// [`Operation::is_rate_limited`].
///
/// ```ignore
/// async fn handler(admitted: Admitted<PostMetricsOp>) -> AppResult<Json<()>> {
///     tracing::info!(device_id = %admitted.device_id, "admitted");
///     Ok(Json(()))
/// }
/// ```
pub struct Admitted<O> {
    pub device_id: String,
    operation: PhantomData<O>,
}

impl<O: GatedOperation> FromRequestParts<AppState> for Admitted<O> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(device_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        state.admission.admit(O::OPERATION, &device_id)?;

        Ok(Admitted {
            device_id,
            operation: PhantomData,
        })
    }
}
