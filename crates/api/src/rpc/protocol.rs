//! Wire types for the RPC front-end.

use iotm_core::admission::Operation;
use iotm_core::validation::{ConfigInput, LimiterInput, MetricInput};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error frame codes.
pub const INVALID_REQUEST: &str = "invalid_request";
pub const INVALID_PARAMS: &str = "invalid_params";
pub const METHOD_NOT_FOUND: &str = "method_not_found";
pub const RESOURCE_EXHAUSTED: &str = "resource_exhausted";
pub const INTERNAL: &str = "internal";

/// An inbound request frame.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Transport-level failure: the call never reached the device service.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RpcError {
    pub code: &'static str,
    pub message: String,
}

/// An outbound reply frame. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Resolve a method name to the operation it invokes.
pub fn operation_for_method(method: &str) -> Option<Operation> {
    Operation::ALL.into_iter().find(|op| op.name() == method)
}

#[derive(Debug, Deserialize)]
pub struct UpdateConfigParams {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub config: Option<ConfigInput>,
}

#[derive(Debug, Deserialize)]
pub struct PostMetricsParams {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub metric: Option<MetricInput>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceParams {
    #[serde(default)]
    pub device_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetLimiterParams {
    #[serde(default)]
    pub device_id: String,
    #[serde(flatten)]
    pub limits: LimiterInput,
}

/// A decoded call, ready for admission and execution.
#[derive(Debug)]
pub enum RpcCall {
    UpdateConfig(UpdateConfigParams),
    PostMetrics(PostMetricsParams),
    GetAlerts(DeviceParams),
    SetLimiter(SetLimiterParams),
}

impl RpcCall {
    /// Decode `params` into the shape `operation` expects.
    ///
    /// Missing params decode as an empty object so absent fields surface as
    /// validation errors rather than decoding failures.
    pub fn decode(operation: Operation, params: Value) -> Result<Self, serde_json::Error> {
        let params = if params.is_null() {
            Value::Object(Default::default())
        } else {
            params
        };
        Ok(match operation {
            Operation::UpdateConfig => RpcCall::UpdateConfig(serde_json::from_value(params)?),
            Operation::PostMetrics => RpcCall::PostMetrics(serde_json::from_value(params)?),
            Operation::GetAlerts => RpcCall::GetAlerts(serde_json::from_value(params)?),
            Operation::SetLimiter => RpcCall::SetLimiter(serde_json::from_value(params)?),
        })
    }

    pub fn operation(&self) -> Operation {
        match self {
            RpcCall::UpdateConfig(_) => Operation::UpdateConfig,
            RpcCall::PostMetrics(_) => Operation::PostMetrics,
            RpcCall::GetAlerts(_) => Operation::GetAlerts,
            RpcCall::SetLimiter(_) => Operation::SetLimiter,
        }
    }

    pub fn device_id(&self) -> &str {
        match self {
            RpcCall::UpdateConfig(p) => &p.device_id,
            RpcCall::PostMetrics(p) => &p.device_id,
            RpcCall::GetAlerts(p) => &p.device_id,
            RpcCall::SetLimiter(p) => &p.device_id,
        }
    }
}
