//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let (app, _) = common::default_app().await;
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["rate_limit_enabled"], true);
    assert_eq!(json["tracked_devices"], 0);
}

// ---------------------------------------------------------------------------
// Test: health is never throttled and does not create buckets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_is_not_rate_limited() {
    let mut config = common::test_config();
    config.default_burst = 0;
    let state = common::test_state(config).await;
    let app = common::build_test_app(state.clone());

    for _ in 0..5 {
        let response = get(app.clone(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert!(state.admission.store().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _) = common::default_app().await;
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let (app, _) = common::default_app().await;
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // The value should be a valid UUID (36 chars with hyphens).
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
