//! Request handlers for the API resources.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers validate the request, delegate to the repositories in
//! `tasknest_db`, and map errors via [`crate::error::AppError`]. Successful
//! GET payloads are written to the response cache through [`respond_cached`]
//! so the cache middleware can replay them byte-for-byte.

pub mod auth;
pub mod project;
pub mod system;
pub mod task;
pub mod user;

use axum::http::{StatusCode, Uri};
use axum::response::Response;
use tasknest_cache::ResponseCache;

use crate::middleware::cache::{json_response, request_cache_key};

/// Serialize a success payload, store it under the request's cache key, and
/// serve it.
pub(crate) async fn respond_cached(
    cache: &ResponseCache,
    uri: &Uri,
    body: serde_json::Value,
) -> Response {
    let serialized = body.to_string();
    cache
        .put(&request_cache_key(uri), serialized.clone())
        .await;
    json_response(StatusCode::OK, serialized)
}
