//! Route definitions for the `/users` resource.

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::user;
use crate::middleware::{auth, cache};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// Every route requires a bearer token. GET responses are served from the
/// response cache when a fresh entry exists. There is no create route here;
/// accounts are created through `/auth/signup`.
///
/// ```text
/// GET    /             -> list
/// GET    /id/{id}      -> get_by_id
/// GET    /find         -> find
/// PUT    /update/{id}  -> update
/// DELETE /delete/{id}  -> delete
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(user::list))
        .route("/id/{id}", get(user::get_by_id))
        .route("/find", get(user::find))
        .route("/update/{id}", put(user::update))
        .route("/delete/{id}", delete(user::delete))
        .layer(from_fn_with_state(state.clone(), cache::serve_cached))
        .layer(from_fn_with_state(state, auth::require_auth))
}
