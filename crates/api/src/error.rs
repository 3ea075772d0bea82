use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use iotm_core::error::CoreError;
use serde_json::json;

use crate::response::StatusResponse;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds transport-specific
/// variants. Implements [`IntoResponse`] to produce consistent responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `iotm_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request could not be decoded (malformed JSON, bad path segment).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Status, machine code and client-facing message for a domain error.
///
/// Shared by the HTTP and RPC front-ends so both report the same outcome
/// for the same failure. Persistence details are logged, never returned.
pub fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string()),
        CoreError::RateLimited { .. } => {
            (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", err.to_string())
        }
        CoreError::ReferentialIntegrity { .. } => {
            (StatusCode::CONFLICT, "REFERENTIAL_INTEGRITY", err.to_string())
        }
        CoreError::Persistence(detail) => {
            tracing::error!(error = %detail, "Persistence failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "persistence error".to_string(),
            )
        }
        CoreError::AlertingUnavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            "ALERTING_UNAVAILABLE",
            err.to_string(),
        ),
        CoreError::AdmissionDisabled => (StatusCode::OK, "ADMISSION_DISABLED", err.to_string()),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            // Throttled callers get a bare status; there is nothing to report.
            AppError::Core(CoreError::RateLimited { .. }) => {
                StatusCode::TOO_MANY_REQUESTS.into_response()
            }
            AppError::Core(core) => {
                let (status, code, message) = classify_core_error(core);
                (status, axum::Json(StatusResponse::failure(code, message))).into_response()
            }
            AppError::BadRequest(msg) => {
                let body = json!({
                    "error": msg,
                    "code": "BAD_REQUEST",
                });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                let body = json!({
                    "error": "An internal error occurred",
                    "code": "INTERNAL_ERROR",
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}
