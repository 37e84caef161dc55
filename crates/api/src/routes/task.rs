//! Route definitions for the `/tasks` resource.

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::task;
use crate::middleware::{auth, cache};
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// Every route requires a bearer token. GET responses are served from the
/// response cache when a fresh entry exists.
///
/// ```text
/// POST   /new          -> create
/// GET    /             -> list
/// GET    /id/{id}      -> get_by_id
/// GET    /find         -> find
/// GET    /findmany     -> find_many
/// PUT    /update/{id}  -> update
/// DELETE /delete/{id}  -> delete
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/new", post(task::create))
        .route("/", get(task::list))
        .route("/id/{id}", get(task::get_by_id))
        .route("/find", get(task::find))
        .route("/findmany", get(task::find_many))
        .route("/update/{id}", put(task::update))
        .route("/delete/{id}", delete(task::delete))
        .layer(from_fn_with_state(state.clone(), cache::serve_cached))
        .layer(from_fn_with_state(state, auth::require_auth))
}
