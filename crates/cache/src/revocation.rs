//! Token revocation store.

use std::time::Duration;

use crate::backend::CacheBackend;

/// Key prefix separating revocation entries from cached responses.
const KEY_PREFIX: &str = "revoked:";

/// Records tokens invalidated by logout until their natural expiry.
///
/// Lookups fail open: when the backend is unreachable a token reads as not
/// revoked, so a cache outage degrades security posture rather than
/// availability. The warning is logged by the backend.
#[derive(Clone)]
pub struct RevocationStore {
    backend: CacheBackend,
}

impl RevocationStore {
    pub fn new(backend: CacheBackend) -> Self {
        Self { backend }
    }

    fn key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }

    /// Mark a token revoked for `ttl`, its remaining validity window.
    pub async fn revoke(&self, token: &str, ttl: Duration) {
        self.backend.set(&Self::key(token), "1".to_string(), ttl).await;
        tracing::debug!("token revoked");
    }

    /// Whether this token has been revoked.
    pub async fn is_revoked(&self, token: &str) -> bool {
        self.backend.exists(&Self::key(token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn revoked_tokens_read_as_revoked() {
        let store = RevocationStore::new(CacheBackend::memory());
        store.revoke("abc.def.ghi", Duration::from_secs(60)).await;
        assert!(store.is_revoked("abc.def.ghi").await);
        assert!(!store.is_revoked("other.token").await);
    }

    #[tokio::test]
    async fn revocation_lapses_with_the_token_lifetime() {
        let store = RevocationStore::new(CacheBackend::memory());
        store.revoke("abc.def.ghi", Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!store.is_revoked("abc.def.ghi").await);
    }
}
