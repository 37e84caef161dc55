use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Response cache TTL in seconds (default: `3600`).
    pub cache_ttl_secs: u64,
    /// Maximum requests per client per rate-limit window (default: `10`).
    pub rate_limit_max_requests: u32,
    /// Rate-limit window in seconds (default: `300`).
    pub rate_limit_window_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `CACHE_TTL_SECS`          | `3600`                     |
    /// | `RATE_LIMIT_MAX_REQUESTS` | `10`                       |
    /// | `RATE_LIMIT_WINDOW_SECS`  | `300`                      |
    ///
    /// `JWT_SECRET` has no default; see [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cache_ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("CACHE_TTL_SECS must be a valid u64");

        let rate_limit_max_requests: u32 = std::env::var("RATE_LIMIT_MAX_REQUESTS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("RATE_LIMIT_MAX_REQUESTS must be a valid u32");

        let rate_limit_window_secs: u64 = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("RATE_LIMIT_WINDOW_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            cache_ttl_secs,
            rate_limit_max_requests,
            rate_limit_window_secs,
            jwt,
        }
    }
}
