//! Cache backend: Redis in shared deployments, a process-local map for
//! single-instance and test runs.
//!
//! Every operation degrades on backend failure: errors are logged at `warn`
//! and reads report a miss. A cache outage must never fail a request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;

/// An in-memory entry with TTL support.
#[derive(Clone, Debug)]
pub struct MemoryEntry {
    value: String,
    stored_at: Instant,
    ttl: Duration,
}

impl MemoryEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }
}

/// Process-wide cache handle. Cloning is cheap; both variants are safe for
/// concurrent use without additional locking.
#[derive(Clone)]
pub enum CacheBackend {
    /// Single-instance mode: process-local map with lazy expiry.
    Memory(Arc<DashMap<String, MemoryEntry>>),

    /// Shared Redis instance; the manager reconnects on its own.
    Redis(ConnectionManager),
}

impl CacheBackend {
    /// Create a process-local backend.
    pub fn memory() -> Self {
        CacheBackend::Memory(Arc::new(DashMap::new()))
    }

    /// Connect to Redis with retrying connection management.
    pub async fn redis(url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(5)
            .set_connection_timeout(Duration::from_secs(2));
        let manager = client.get_connection_manager_with_config(config).await?;
        Ok(CacheBackend::Redis(manager))
    }

    /// Fetch a value. Expired in-memory entries are evicted on read.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self {
            CacheBackend::Memory(map) => {
                if let Some(entry) = map.get(key) {
                    if !entry.is_expired() {
                        return Some(entry.value.clone());
                    }
                    drop(entry);
                    map.remove(key);
                }
                None
            }
            CacheBackend::Redis(manager) => {
                let mut conn = manager.clone();
                match conn.get::<_, Option<String>>(key).await {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Redis GET failed");
                        None
                    }
                }
            }
        }
    }

    /// Store a value for `ttl`.
    pub async fn set(&self, key: &str, value: String, ttl: Duration) {
        match self {
            CacheBackend::Memory(map) => {
                map.insert(key.to_string(), MemoryEntry::new(value, ttl));
            }
            CacheBackend::Redis(manager) => {
                let mut conn = manager.clone();
                if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await {
                    tracing::warn!(key = %key, error = %e, "Redis SET failed");
                }
            }
        }
    }

    /// Remove a single key.
    pub async fn delete(&self, key: &str) {
        match self {
            CacheBackend::Memory(map) => {
                map.remove(key);
            }
            CacheBackend::Redis(manager) => {
                let mut conn = manager.clone();
                if let Err(e) = conn.del::<_, ()>(key).await {
                    tracing::warn!(key = %key, error = %e, "Redis DEL failed");
                }
            }
        }
    }

    /// Remove every key starting with `prefix`.
    pub async fn delete_prefix(&self, prefix: &str) {
        match self {
            CacheBackend::Memory(map) => {
                map.retain(|key, _| !key.starts_with(prefix));
            }
            CacheBackend::Redis(manager) => {
                let pattern = format!("{prefix}*");
                let mut scan_conn = manager.clone();
                let keys = match scan_conn.scan_match::<_, String>(&pattern).await {
                    Ok(mut iter) => {
                        let mut keys = Vec::new();
                        while let Some(key) = iter.next_item().await {
                            keys.push(key);
                        }
                        keys
                    }
                    Err(e) => {
                        tracing::warn!(pattern = %pattern, error = %e, "Redis SCAN failed");
                        return;
                    }
                };
                if keys.is_empty() {
                    return;
                }
                let mut conn = manager.clone();
                if let Err(e) = conn.del::<_, ()>(keys).await {
                    tracing::warn!(pattern = %pattern, error = %e, "Redis DEL failed");
                }
            }
        }
    }

    /// Whether a key is present and unexpired.
    pub async fn exists(&self, key: &str) -> bool {
        match self {
            CacheBackend::Memory(map) => {
                if let Some(entry) = map.get(key) {
                    if !entry.is_expired() {
                        return true;
                    }
                    drop(entry);
                    map.remove(key);
                }
                false
            }
            CacheBackend::Redis(manager) => {
                let mut conn = manager.clone();
                match conn.exists::<_, bool>(key).await {
                    Ok(found) => found,
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Redis EXISTS failed");
                        false
                    }
                }
            }
        }
    }
}
