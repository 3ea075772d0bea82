//! Frame-level dispatch: decode, admit, validate, execute, encode.
//!
//! Business outcomes (including validation and storage failures) are
//! reported as `result` frames carrying the same status envelope the HTTP
//! front-end returns. Only decoding failures and admission rejections use
//! `error` frames.

use iotm_core::error::CoreError;
use serde::Serialize;
use serde_json::Value;

use super::protocol::{
    operation_for_method, RpcCall, RpcRequest, RpcResponse, INTERNAL, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, RESOURCE_EXHAUSTED,
};
use crate::error::classify_core_error;
use crate::response::{DataResponse, StatusResponse};
use crate::state::AppState;

/// Handle one inbound text frame and produce its reply.
pub async fn dispatch_frame(state: &AppState, frame: &str) -> RpcResponse {
    let request: RpcRequest = match serde_json::from_str(frame) {
        Ok(request) => request,
        Err(e) => return RpcResponse::error(Value::Null, INVALID_REQUEST, e.to_string()),
    };

    let Some(operation) = operation_for_method(&request.method) else {
        return RpcResponse::error(
            request.id,
            METHOD_NOT_FOUND,
            format!("unknown method '{}'", request.method),
        );
    };

    let call = match RpcCall::decode(operation, request.params) {
        Ok(call) => call,
        Err(e) => return RpcResponse::error(request.id, INVALID_PARAMS, e.to_string()),
    };

    if let Err(err) = state.admission.admit(operation, call.device_id()) {
        return RpcResponse::error(request.id, RESOURCE_EXHAUSTED, err.to_string());
    }

    let outcome = match execute(state, call).await {
        Ok(value) => value,
        Err(err) => {
            let (_, code, message) = classify_core_error(&err);
            encode(&StatusResponse::failure(code, message))
        }
    };

    match outcome {
        Ok(result) => RpcResponse::result(request.id, result),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode RPC result");
            RpcResponse::error(request.id, INTERNAL, "failed to encode result")
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

/// Run an admitted call. The outer error is a domain failure, the inner one
/// an encoding failure of a successful result.
async fn execute(
    state: &AppState,
    call: RpcCall,
) -> Result<Result<Value, serde_json::Error>, CoreError> {
    match call {
        RpcCall::UpdateConfig(params) => {
            let config = params
                .config
                .unwrap_or_default()
                .into_config(&params.device_id)?;
            let saved = state.devices.update_config(config).await?;
            Ok(encode(&DataResponse::ok(saved)))
        }
        RpcCall::PostMetrics(params) => {
            let metric = params
                .metric
                .unwrap_or_default()
                .into_metric(&params.device_id)?;
            let ingested = state.devices.post_metric(metric).await?;
            Ok(encode(&DataResponse::ok(ingested)))
        }
        RpcCall::GetAlerts(params) => {
            iotm_core::validation::validate_device_id(&params.device_id)?;
            let alerts = state.devices.get_alerts(&params.device_id).await?;
            Ok(encode(&DataResponse::ok(alerts)))
        }
        RpcCall::SetLimiter(params) => {
            let limits = params.limits.into_override(&params.device_id)?;
            state.admission.set_override(&params.device_id, limits)?;
            Ok(encode(&StatusResponse::ok()))
        }
    }
}
