//! HTTP-level tests for the response cache and its interaction with auth
//! and the clearcache endpoint.
//!
//! The database pool points at a closed port, so a 200 on a GET route can
//! only come from the cache; a 500 proves the request fell through to the
//! (unreachable) database.

mod common;

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use common::{body_json, get_auth, post, put_json_auth};

// ---------------------------------------------------------------------------
// Cache hits
// ---------------------------------------------------------------------------

/// A fresh cache entry is served without touching the database.
#[tokio::test]
async fn cached_get_is_served_without_database() {
    let config = common::test_config();
    let state = common::test_state(&config);
    let token = common::auth_token(&config.jwt);

    let cached = serde_json::json!({ "success": true, "totalResults": 0, "results": [] });
    state.cache.put("/projects", cached.to_string()).await;

    let app = common::build_app(state, &config);
    let response = get_auth(app, "/projects", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let json = body_json(response).await;
    assert_eq!(json, cached);
}

/// Cache keys include the query string; a different query misses.
#[tokio::test]
async fn cache_key_includes_query_string() {
    let config = common::test_config();
    let state = common::test_state(&config);
    let token = common::auth_token(&config.jwt);

    let cached = serde_json::json!({ "success": true, "totalResults": 0, "tasks": [] });
    state
        .cache
        .put("/tasks/findmany?status=Pending", cached.to_string())
        .await;

    let app = common::build_app(state, &config);

    let hit = get_auth(app.clone(), "/tasks/findmany?status=Pending", &token).await;
    assert_eq!(hit.status(), StatusCode::OK);
    assert_eq!(body_json(hit).await, cached);

    // Same route, different query: falls through to the dead database.
    let miss = get_auth(app, "/tasks/findmany?status=Completed", &token).await;
    assert_eq!(miss.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// The cache sits behind auth: a cached entry does not leak to
/// unauthenticated callers.
#[tokio::test]
async fn cached_entry_still_requires_auth() {
    let config = common::test_config();
    let state = common::test_state(&config);

    state
        .cache
        .put("/projects", r#"{"success":true}"#.to_string())
        .await;

    let app = common::build_app(state, &config);
    let response = common::get(app, "/projects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Non-GET requests pass the cache layer untouched.
#[tokio::test]
async fn non_get_requests_bypass_cache() {
    let config = common::test_config();
    let state = common::test_state(&config);
    let token = common::auth_token(&config.jwt);

    state
        .cache
        .put("/projects/update/abc", r#"{"success":true}"#.to_string())
        .await;

    let app = common::build_app(state, &config);
    let response = put_json_auth(
        app,
        "/projects/update/abc",
        &token,
        serde_json::json!({}),
    )
    .await;

    // The malformed path id fails validation; the seeded entry is ignored.
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

// ---------------------------------------------------------------------------
// Expiry and clearing
// ---------------------------------------------------------------------------

/// Entries age out after the configured TTL.
#[tokio::test]
async fn cached_entry_expires_after_ttl() {
    let mut config = common::test_config();
    config.cache_ttl_secs = 1;
    let state = common::test_state(&config);
    let token = common::auth_token(&config.jwt);

    state
        .cache
        .put("/tasks", r#"{"success":true,"totalResults":0,"results":[]}"#.to_string())
        .await;

    let app = common::build_app(state, &config);

    let hit = get_auth(app.clone(), "/tasks", &token).await;
    assert_eq!(hit.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1200)).await;

    let expired = get_auth(app, "/tasks", &token).await;
    assert_eq!(expired.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// POST /clearcache drops every cached response.
#[tokio::test]
async fn clearcache_empties_the_response_cache() {
    let config = common::test_config();
    let state = common::test_state(&config);
    let token = common::auth_token(&config.jwt);

    state
        .cache
        .put("/projects", r#"{"success":true}"#.to_string())
        .await;

    let app = common::build_app(state, &config);

    let response = post(app.clone(), "/clearcache").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Cache cleared successfully");

    let after = get_auth(app, "/projects", &token).await;
    assert_eq!(after.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// Clearing the response cache must not forget revoked tokens.
#[tokio::test]
async fn revocations_survive_cache_clear() {
    let config = common::test_config();
    let state = common::test_state(&config);
    let token = common::auth_token(&config.jwt);

    state.revocation.revoke(&token, Duration::from_secs(60)).await;

    let app = common::build_app(state, &config);

    let response = post(app.clone(), "/clearcache").await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = get_auth(app, "/projects", &token).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(after).await;
    assert_eq!(json["message"], "The token has been revoked");
}
