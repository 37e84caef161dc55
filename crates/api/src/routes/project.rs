//! Route definitions for the `/projects` resource.

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::project;
use crate::middleware::{auth, cache};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// Every route requires a bearer token. GET responses are served from the
/// response cache when a fresh entry exists.
///
/// ```text
/// POST   /new          -> create
/// GET    /             -> list
/// GET    /id/{id}      -> get_by_id
/// GET    /find         -> find
/// PUT    /update/{id}  -> update
/// DELETE /delete/{id}  -> delete
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/new", post(project::create))
        .route("/", get(project::list))
        .route("/id/{id}", get(project::get_by_id))
        .route("/find", get(project::find))
        .route("/update/{id}", put(project::update))
        .route("/delete/{id}", delete(project::delete))
        .layer(from_fn_with_state(state.clone(), cache::serve_cached))
        .layer(from_fn_with_state(state, auth::require_auth))
}
