use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tasknest_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and sqlx failures. Implements
/// [`IntoResponse`] as the single centralized responder: every failure,
/// wherever it is raised, renders as the same
/// `{"success": false, "name": ..., "message": ...}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tasknest_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Operational errors are expected request outcomes; keep them out of
        // the error log.
        match &self {
            AppError::Core(core) if core.is_operational() => {
                tracing::debug!(error = %core, "Request failed");
            }
            _ => {}
        }

        let (status, body) = match self {
            AppError::Core(CoreError::NotFound { name, message }) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "name": name, "message": message }),
            ),
            AppError::Core(CoreError::Validation { context, errors }) => (
                StatusCode::NOT_ACCEPTABLE,
                json!({
                    "success": false,
                    "name": "ValidationError",
                    "message": format!("{context} validation failed"),
                    "errors": errors,
                }),
            ),
            AppError::Core(CoreError::InvalidId) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "name": "Bad Request", "message": "Invalid ObjectId" }),
            ),
            AppError::Core(CoreError::Conflict { name, message }) => (
                StatusCode::CONFLICT,
                json!({ "success": false, "name": name, "message": message }),
            ),
            AppError::Core(CoreError::Unauthorized { name, message }) => (
                StatusCode::UNAUTHORIZED,
                json!({ "success": false, "name": name, "message": message }),
            ),
            AppError::Core(CoreError::BadRequest { name, message }) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "name": name, "message": message }),
            ),
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
            AppError::Database(err) => classify_sqlx_error(&err),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Generic 500 envelope. Internals are logged, never surfaced to callers.
fn internal_error() -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "success": false,
            "name": "Internal Server Error",
            "message": "An unexpected error occurred.",
        }),
    )
}

/// Classify a sqlx error into an HTTP status and response envelope.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to 409; the indexes back up the handler-level duplicate pre-checks
///   under concurrent writes.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, serde_json::Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            json!({
                "success": false,
                "name": "Not Found",
                "message": "The requested resource was not found",
            }),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        json!({
                            "success": false,
                            "name": "Conflict",
                            "message": format!("Duplicate value violates unique constraint: {constraint}"),
                        }),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal_error()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}
