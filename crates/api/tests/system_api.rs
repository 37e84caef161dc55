//! Integration tests for the operational endpoints and general HTTP
//! behaviour: db-status, the JSON 404 fallback, request IDs, CORS, and
//! rate limiting.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /db-status reports the unreachable database
// ---------------------------------------------------------------------------

#[tokio::test]
async fn db_status_reports_disconnected_database() {
    let app = common::build_test_app();

    let response = get(app, "/db-status").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Database is not connected");
    // The health body is a bare acknowledgement, not the error envelope.
    assert!(json["name"].is_null());
}

// ---------------------------------------------------------------------------
// Test: unknown routes return the JSON 404 body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = common::build_test_app();

    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Route not found");
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app();

    let response = get(app, "/this-route-does-not-exist").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let app = common::build_test_app();

    // CORS preflight requires custom headers, so we build the request manually.
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/projects")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "authorization")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .expect("preflight must allow the configured origin"),
        "http://localhost:5173"
    );
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

/// Requests beyond the budget get 429 with a Retry-After hint.
#[tokio::test]
async fn rate_limit_returns_429_after_burst() {
    let mut config = common::test_config();
    config.rate_limit_max_requests = 2;
    config.rate_limit_window_secs = 300;
    let state = common::test_state(&config);
    let app = common::build_app(state, &config);

    for _ in 0..2 {
        let response = get(app.clone(), "/this-route-does-not-exist").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = get(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after = response
        .headers()
        .get("retry-after")
        .expect("429 must carry Retry-After")
        .to_str()
        .unwrap()
        .parse::<u64>()
        .expect("Retry-After must be numeric");
    assert!(retry_after >= 1);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["name"], "Too Many Requests");
    assert_eq!(json["message"], "Too many requests, please try again later.");
}

/// Budgets are tracked per client; a forwarded address gets its own bucket.
#[tokio::test]
async fn rate_limit_is_per_client() {
    let mut config = common::test_config();
    config.rate_limit_max_requests = 2;
    config.rate_limit_window_secs = 300;
    let state = common::test_state(&config);
    let app = common::build_app(state, &config);

    // Exhaust the socket-address bucket.
    for _ in 0..2 {
        let _ = get(app.clone(), "/this-route-does-not-exist").await;
    }
    let blocked = get(app.clone(), "/this-route-does-not-exist").await;
    assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different forwarded client is still within budget.
    let request = Request::builder()
        .uri("/this-route-does-not-exist")
        .header("x-forwarded-for", "203.0.113.9")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
