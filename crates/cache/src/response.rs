//! HTTP response cache keyed by the exact request path+query.

use std::time::Duration;

use crate::backend::CacheBackend;

/// Key prefix separating response entries from revocation entries.
const KEY_PREFIX: &str = "cache:";

/// Stores serialized JSON response bodies under the request path+query with
/// a fixed TTL. Reads within the TTL return the stored bytes unchanged, even
/// if the primary store has moved on; writes to an entity delete its list
/// and by-id entries so the next read recomputes.
#[derive(Clone)]
pub struct ResponseCache {
    backend: CacheBackend,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(backend: CacheBackend, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    fn key(uri: &str) -> String {
        format!("{KEY_PREFIX}{uri}")
    }

    /// Cached body for this request, if present.
    pub async fn get(&self, uri: &str) -> Option<String> {
        let hit = self.backend.get(&Self::key(uri)).await;
        if hit.is_some() {
            tracing::debug!(uri = %uri, "response cache hit");
        } else {
            tracing::debug!(uri = %uri, "response cache miss");
        }
        hit
    }

    /// Store a response body under this request.
    pub async fn put(&self, uri: &str, body: String) {
        self.backend.set(&Self::key(uri), body, self.ttl).await;
    }

    /// Drop the entry for one request path.
    pub async fn invalidate(&self, uri: &str) {
        self.backend.delete(&Self::key(uri)).await;
        tracing::debug!(uri = %uri, "response cache invalidated");
    }

    /// Drop every cached response. Revocation entries are a different
    /// namespace and survive; flushing the cache must not un-revoke tokens.
    pub async fn clear(&self) {
        self.backend.delete_prefix(KEY_PREFIX).await;
        tracing::debug!("response cache cleared");
    }
}
