#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use iotm_api::config::{LogFormat, ServerConfig};
use iotm_api::router::build_app_router;
use iotm_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Admission is on with a bucket that never refills, so tests can count
/// admitted calls exactly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        http_port: 0,
        rpc_port: 0,
        database_url: iotm_db::MEMORY_URL.to_string(),
        rate_limit_enabled: true,
        default_rate: 0.0,
        default_burst: 100,
        request_timeout_secs: 30,
        log_format: LogFormat::Pretty,
    }
}

/// Fresh state over a migrated in-memory database.
pub async fn test_state(config: ServerConfig) -> AppState {
    let pool = iotm_db::create_memory_pool().await.unwrap();
    iotm_db::run_migrations(&pool).await.unwrap();
    AppState::new(pool, config)
}

/// Build the full HTTP router with all middleware layers, exactly as
/// `main.rs` does.
pub fn build_test_app(state: AppState) -> Router {
    let config = state.config.as_ref().clone();
    build_app_router(state, &config)
}

/// Router plus the state behind it, using [`test_config`].
pub async fn default_app() -> (Router, AppState) {
    let state = test_state(test_config()).await;
    (build_test_app(state.clone()), state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn config_body(temperature_threshold: f64, battery_threshold: f64) -> Value {
    serde_json::json!({
        "temperature_threshold": temperature_threshold,
        "battery_threshold": battery_threshold,
    })
}

pub fn metric_body(temperature: f64, battery: f64) -> Value {
    serde_json::json!({
        "timestamp": "2024-05-01T12:00:00Z",
        "temperature": temperature,
        "battery": battery,
    })
}
