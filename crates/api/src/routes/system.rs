//! Route definitions for the operational endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::system;
use crate::state::AppState;

/// Operational routes merged at the root level.
///
/// Both are public so monitoring and deploy tooling can reach them without
/// a token.
///
/// ```text
/// GET  /db-status   -> db_status
/// POST /clearcache  -> clear_cache
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/db-status", get(system::db_status))
        .route("/clearcache", post(system::clear_cache))
}
