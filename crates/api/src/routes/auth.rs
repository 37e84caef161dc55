//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// All three are public. Logout reads the bearer token itself so that a
/// missing token yields a 400 rather than the middleware 401.
///
/// ```text
/// POST /signup  -> signup
/// POST /login   -> login
/// POST /logout  -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}
