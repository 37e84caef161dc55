//! Per-client request rate limiting.
//!
//! A keyed GCRA limiter ([`governor`]) holds one budget per client key. The
//! key is the first `x-forwarded-for` entry when a fronting proxy supplies
//! one, otherwise the peer socket address. Exceeding the budget yields a 429
//! with a `Retry-After` header.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, QuantaClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use serde_json::json;

use crate::state::AppState;

/// Keyed limiter plus the clock used to translate denials into wait times.
pub struct RequestRateLimiter {
    limiter: RateLimiter<String, DefaultKeyedStateStore<String>, QuantaClock>,
    clock: QuantaClock,
}

impl RequestRateLimiter {
    /// Build a limiter allowing `max_requests` per `window` per client.
    ///
    /// # Panics
    ///
    /// Panics on a zero request budget or a zero window; both are startup
    /// misconfigurations.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        let burst =
            NonZeroU32::new(max_requests).expect("RATE_LIMIT_MAX_REQUESTS must be nonzero");
        let quota = Quota::with_period(window / burst.get())
            .expect("RATE_LIMIT_WINDOW_SECS must be nonzero")
            .allow_burst(burst);

        let clock = QuantaClock::default();
        let limiter = RateLimiter::new(quota, DefaultKeyedStateStore::default(), &clock);

        Self { limiter, clock }
    }

    /// Check one request against the client's budget.
    ///
    /// Returns the whole seconds to wait (rounded up) when denied.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.limiter.check_key(&key.to_string()).map_err(|denied| {
            let wait = denied.wait_time_from(self.clock.now());
            wait.as_secs() + u64::from(wait.subsec_nanos() > 0)
        })
    }
}

/// Derive the rate-limit key for a request.
fn client_key(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}

/// Reject clients that exceed the configured request budget with 429.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(request.headers(), addr);

    match state.rate_limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(retry_secs) => {
            tracing::debug!(%key, retry_secs, "Rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, retry_secs.to_string())],
                axum::Json(json!({
                    "success": false,
                    "name": "Too Many Requests",
                    "message": "Too many requests, please try again later.",
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_allows_burst_then_denies() {
        let limiter = RequestRateLimiter::new(3, Duration::from_secs(300));

        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1").is_ok());
        }
        let retry_secs = limiter.check("10.0.0.1").unwrap_err();
        assert!(retry_secs >= 1, "denial should report a wait time");
    }

    #[test]
    fn budgets_are_per_key() {
        let limiter = RequestRateLimiter::new(1, Duration::from_secs(300));

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
        assert!(limiter.check("10.0.0.2").is_ok());
    }

    #[test]
    fn forwarded_header_wins_over_socket_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        let addr: SocketAddr = "127.0.0.1:9999".parse().unwrap();

        assert_eq!(client_key(&headers, addr), "203.0.113.7");
        assert_eq!(client_key(&HeaderMap::new(), addr), "127.0.0.1");
    }
}
