//! Operational endpoints: database health, cache flush, and the 404
//! fallback.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::response::Acknowledgement;
use crate::state::AppState;

/// GET /db-status
///
/// Probes the pool with a trivial query. Reports 500 without touching the
/// error envelope so monitoring sees a plain `{success, message}` body.
pub async fn db_status(State(state): State<AppState>) -> (StatusCode, Json<Acknowledgement>) {
    match tasknest_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(Acknowledgement {
                success: true,
                message: "Database is connected",
            }),
        ),
        Err(err) => {
            tracing::error!(error = %err, "Database health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Acknowledgement {
                    success: false,
                    message: "Database is not connected",
                }),
            )
        }
    }
}

/// POST /clearcache
///
/// Flushes every cached response. Revoked-token entries live in a separate
/// namespace and survive the flush.
pub async fn clear_cache(State(state): State<AppState>) -> Json<Acknowledgement> {
    state.cache.clear().await;
    tracing::info!("Response cache cleared");

    Json(Acknowledgement {
        success: true,
        message: "Cache cleared successfully",
    })
}

/// Fallback for unmatched routes.
pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
        })),
    )
}
