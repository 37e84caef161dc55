//! Read-through response cache for GET endpoints.
//!
//! The middleware answers GET requests whose exact path+query is cached;
//! misses fall through to the handler, which writes the entry on success via
//! [`crate::handlers::respond_cached`]. Both sides use the same key and the
//! same serialized bytes, so a replayed response is byte-identical to the
//! one that was stored.

use axum::extract::{OriginalUri, Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Cache key for a request: the exact path plus query string.
pub fn request_cache_key(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Serve GET responses from the cache when present.
///
/// `OriginalUri` keeps nested-router prefixes in the key, so the handler
/// writing `/projects/id/{id}` and this lookup agree.
pub async fn serve_cached(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    if let Some(body) = state.cache.get(&request_cache_key(&uri)).await {
        return json_response(StatusCode::OK, body);
    }

    next.run(request).await
}

/// Render pre-serialized JSON with the right content type.
pub(crate) fn json_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}
