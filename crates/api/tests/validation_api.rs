//! HTTP-level tests for request validation: rule lists on create bodies,
//! query parameter checks, and path id handling.
//!
//! Every request here fails validation before reaching a repository, so no
//! live database is needed.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth, put_json_auth};

fn token() -> String {
    common::auth_token(&common::test_config().jwt)
}

// ---------------------------------------------------------------------------
// Signup rules
// ---------------------------------------------------------------------------

/// A weak password reports every violated rule, not just the first.
#[tokio::test]
async fn signup_weak_password_collects_all_errors() {
    let app = common::build_test_app();

    let body = serde_json::json!({
        "username": "riley",
        "firstName": "Riley",
        "lastName": "Nguyen",
        "email": "riley@example.com",
        "password": "short",
    });
    let response = post_json(app, "/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Data validation failed");

    let errors = json["errors"].as_array().unwrap();
    assert!(errors.contains(&serde_json::json!(
        "Password must be at least 8 characters long"
    )));
    assert!(errors.contains(&serde_json::json!(
        "Password must include uppercase, lowercase, a digit, and a special character"
    )));
}

/// A malformed email fails the format rule.
#[tokio::test]
async fn signup_invalid_email_returns_406() {
    let app = common::build_test_app();

    let body = serde_json::json!({
        "username": "riley",
        "firstName": "Riley",
        "lastName": "Nguyen",
        "email": "not-an-email",
        "password": "Str0ng!pass",
    });
    let response = post_json(app, "/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    let errors = json["errors"].as_array().unwrap();
    assert!(errors.contains(&serde_json::json!("Email must be a valid email address")));
}

// ---------------------------------------------------------------------------
// Create-body rules
// ---------------------------------------------------------------------------

/// A task body without its required dueDate fails structural validation
/// under the Task context.
#[tokio::test]
async fn task_create_missing_due_date_returns_406() {
    let app = common::build_test_app();

    let body = serde_json::json!({
        "name": "Wire up CI",
        "description": "Add the pipeline config",
        "project": "507f1f77bcf86cd799439011",
    });
    let response = post_json_auth(app, "/tasks/new", &token(), body).await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    assert_eq!(json["name"], "ValidationError");
    assert_eq!(json["message"], "Task validation failed");
}

/// A task body with a malformed project id fails the id rule.
#[tokio::test]
async fn task_create_invalid_project_id_returns_406() {
    let app = common::build_test_app();

    let body = serde_json::json!({
        "name": "Wire up CI",
        "description": "Add the pipeline config",
        "project": "not-hex",
        "dueDate": "2025-12-31",
    });
    let response = post_json_auth(app, "/tasks/new", &token(), body).await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    let errors = json["errors"].as_array().unwrap();
    assert!(errors.contains(&serde_json::json!("Invalid ObjectId format")));
}

/// Create bodies reject unknown fields.
#[tokio::test]
async fn project_create_unknown_field_returns_406() {
    let app = common::build_test_app();

    let body = serde_json::json!({
        "name": "Website refresh",
        "description": "New marketing site",
        "dueDate": "2025-12-31",
        "owner": "riley",
    });
    let response = post_json_auth(app, "/projects/new", &token(), body).await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Project validation failed");
    let errors = json["errors"].as_array().unwrap();
    assert!(errors[0].as_str().unwrap().contains("owner"));
}

/// Update bodies run the same field rules as create.
#[tokio::test]
async fn project_update_invalid_due_date_returns_406() {
    let app = common::build_test_app();

    let body = serde_json::json!({ "dueDate": "13/01/2025" });
    let response = put_json_auth(
        app,
        "/projects/update/507f1f77bcf86cd799439011",
        &token(),
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    let errors = json["errors"].as_array().unwrap();
    assert!(errors.contains(&serde_json::json!(
        "dueDate must be in ISO 8601 date format"
    )));
}

// ---------------------------------------------------------------------------
// Path and query ids
// ---------------------------------------------------------------------------

/// A malformed path id fails under the ID context.
#[tokio::test]
async fn malformed_path_id_returns_406_with_id_context() {
    let app = common::build_test_app();

    let response = get_auth(app, "/projects/id/abc", &token()).await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    assert_eq!(json["name"], "ValidationError");
    assert_eq!(json["message"], "ID validation failed");
    assert_eq!(json["errors"][0], "Invalid ObjectId format");
}

/// A malformed id in a query string is a plain 400, not a rule list.
#[tokio::test]
async fn malformed_query_id_returns_400() {
    let app = common::build_test_app();

    let response = get_auth(app, "/projects/find?id=xyz", &token()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Bad Request");
    assert_eq!(json["message"], "Invalid ObjectId");
}

/// List endpoints apply the same id check to their filter parameters.
#[tokio::test]
async fn list_filter_with_malformed_id_returns_400() {
    let app = common::build_test_app();

    let response = get_auth(app, "/tasks?id=invalidId", &token()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid ObjectId");
}

/// An unknown status value in a query fails under the Query context.
#[tokio::test]
async fn unknown_status_in_query_returns_406() {
    let app = common::build_test_app();

    let response = get_auth(app, "/tasks/find?status=Paused", &token()).await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Query validation failed");
    assert_eq!(
        json["errors"][0],
        "Status must be one of: Pending, In Progress, Completed"
    );
}
