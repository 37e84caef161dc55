//! HTTP-level integration tests for authentication: bearer-token
//! enforcement on protected routes, logout, and token revocation.
//!
//! All tests run against the full middleware stack with the in-memory
//! backend; no live database is needed because every request here is
//! rejected before a repository call.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, StatusCode};
use common::{body_json, get, get_auth, post, post_auth, post_json};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Bearer-token enforcement
// ---------------------------------------------------------------------------

/// A protected route without an Authorization header returns 401.
#[tokio::test]
async fn missing_authorization_header_returns_401() {
    let app = common::build_test_app();

    let response = get(app, "/projects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["name"], "Unauthorized");
    assert_eq!(json["message"], "Missing or invalid Authorization header");
}

/// A non-Bearer scheme is rejected the same way as a missing header.
#[tokio::test]
async fn non_bearer_scheme_returns_401() {
    let app = common::build_test_app();

    let request = Request::builder()
        .uri("/tasks")
        .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Missing or invalid Authorization header");
}

/// `Bearer` with an empty token is called out separately.
#[tokio::test]
async fn empty_bearer_token_returns_401() {
    let app = common::build_test_app();

    let request = Request::builder()
        .uri("/users")
        .header(AUTHORIZATION, "Bearer ")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Unauthorized access token");
}

/// A token that is not a JWT at all is rejected as invalid.
#[tokio::test]
async fn garbage_token_returns_401() {
    let app = common::build_test_app();

    let response = get_auth(app, "/projects", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Invalid token");
    assert_eq!(json["message"], "The token is not valid");
}

/// A token signed with a different secret fails signature validation.
#[tokio::test]
async fn token_with_wrong_secret_returns_401() {
    let app = common::build_test_app();

    let mut foreign = common::test_config().jwt;
    foreign.secret = "some-other-secret".to_string();
    let token = common::auth_token(&foreign);

    let response = get_auth(app, "/projects", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "The token is not valid");
}

/// A well-signed token that has been revoked is rejected with the
/// revocation message.
#[tokio::test]
async fn revoked_token_returns_401() {
    let config = common::test_config();
    let state = common::test_state(&config);
    let token = common::auth_token(&config.jwt);

    state.revocation.revoke(&token, Duration::from_secs(60)).await;

    let app = common::build_app(state, &config);
    let response = get_auth(app, "/projects", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Invalid token");
    assert_eq!(json["message"], "The token has been revoked");
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Logout without a token is a 400, not the middleware 401.
#[tokio::test]
async fn logout_without_token_returns_400() {
    let app = common::build_test_app();

    let response = post(app, "/auth/logout").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Bad Request");
    assert_eq!(json["message"], "Missing authentication token");
}

/// Logging out revokes the token: the logout succeeds, and the same token
/// is then rejected on a protected route.
#[tokio::test]
async fn logout_revokes_the_token() {
    let config = common::test_config();
    let state = common::test_state(&config);
    let token = common::auth_token(&config.jwt);
    let app = common::build_app(state, &config);

    let response = post_auth(app.clone(), "/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "User logged out successfully");

    let response = get_auth(app, "/projects", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "The token has been revoked");
}

/// Logging out twice is idempotent; the second call also reports success.
#[tokio::test]
async fn logout_is_idempotent() {
    let app = common::build_test_app();
    let token = common::auth_token(&common::test_config().jwt);

    let first = post_auth(app.clone(), "/auth/logout", &token).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_auth(app, "/auth/logout", &token).await;
    assert_eq!(second.status(), StatusCode::OK);
    let json = body_json(second).await;
    assert_eq!(json["message"], "User logged out successfully");
}

// ---------------------------------------------------------------------------
// Signup / login request validation
// ---------------------------------------------------------------------------

/// Signup with empty required fields returns the full list of messages.
#[tokio::test]
async fn signup_with_empty_fields_returns_406() {
    let app = common::build_test_app();

    let body = serde_json::json!({
        "username": "",
        "firstName": "",
        "lastName": "Riley",
        "email": "riley@example.com",
        "password": "Str0ng!pass",
    });
    let response = post_json(app, "/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    assert_eq!(json["name"], "ValidationError");
    assert_eq!(json["message"], "Data validation failed");

    let errors = json["errors"].as_array().unwrap();
    assert!(errors.contains(&serde_json::json!("Username cannot be empty")));
    assert!(errors.contains(&serde_json::json!("First name cannot be empty")));
}

/// Login with a missing field fails structural validation.
#[tokio::test]
async fn login_with_missing_password_returns_406() {
    let app = common::build_test_app();

    let body = serde_json::json!({ "email": "riley@example.com" });
    let response = post_json(app, "/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    assert_eq!(json["name"], "ValidationError");
    assert_eq!(json["message"], "Data validation failed");
}
