//! Shared response envelope types for both front-ends.
//!
//! Every device operation answers with a `{ "success", "message" }` status,
//! plus `data` when the operation returns a payload and `code` when it
//! failed.

use serde::Serialize;

/// Message carried by every successful status.
pub const OK_MESSAGE: &str = "OK";

/// Status-only envelope.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: OK_MESSAGE.to_string(),
            code: None,
        }
    }

    pub fn failure(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: Some(code),
        }
    }
}

/// Successful status with a payload.
///
/// ```ignore
/// Ok(Json(DataResponse::ok(alerts)))
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: OK_MESSAGE.to_string(),
            data,
        }
    }
}
