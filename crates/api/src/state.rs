use std::sync::Arc;

use tasknest_cache::{ResponseCache, RevocationStore};

use crate::config::ServerConfig;
use crate::middleware::rate_limit::RequestRateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tasknest_db::DbPool,
    /// Response cache over the shared cache backend.
    pub cache: ResponseCache,
    /// Revoked-token store over the shared cache backend.
    pub revocation: RevocationStore,
    /// Per-client request rate limiter.
    pub rate_limiter: Arc<RequestRateLimiter>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
}
