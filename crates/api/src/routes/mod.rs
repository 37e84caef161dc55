pub mod auth;
pub mod project;
pub mod system;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup             register (public)
/// /auth/login              login (public)
/// /auth/logout             logout (public, reads bearer token)
///
/// /users                   list (auth, cached)
/// /users/id/{id}           get by id (auth, cached)
/// /users/find              find one by query (auth, cached)
/// /users/update/{id}       update (auth)
/// /users/delete/{id}       delete (auth)
///
/// /projects/new            create (auth)
/// /projects                list (auth, cached)
/// /projects/id/{id}        get by id (auth, cached)
/// /projects/find           find one by query (auth, cached)
/// /projects/update/{id}    update (auth)
/// /projects/delete/{id}    delete (auth)
///
/// /tasks/new               create (auth)
/// /tasks                   list (auth, cached)
/// /tasks/id/{id}           get by id (auth, cached)
/// /tasks/find              find one by query (auth, cached)
/// /tasks/findmany          find all by query (auth, cached)
/// /tasks/update/{id}       update (auth)
/// /tasks/delete/{id}       delete (auth)
///
/// /db-status               database health probe (public)
/// /clearcache              flush response cache (public)
/// ```
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Authentication routes (signup, login, logout).
        .nest("/auth", auth::router())
        // User accounts.
        .nest("/users", user::router(state.clone()))
        // Projects.
        .nest("/projects", project::router(state.clone()))
        // Tasks.
        .nest("/tasks", task::router(state))
        // Operational endpoints at the root level.
        .merge(system::router())
}
