//! JWT token generation and validation.
//!
//! Tokens are HS256-signed JWTs carrying a [`Claims`] payload (user id and
//! role). Logout does not invalidate the signature; it records the exact
//! token string in the revocation store, so verification always pairs the
//! signature check with a revocation lookup.

use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tasknest_core::types::{ObjectId, Role};

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's ObjectId.
    pub sub: ObjectId,
    /// The user's role (`"USER"`, `"MANAGER"`, `"ADMIN"`).
    pub role: Role,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in seconds (default: 3600).
    pub token_expiry_secs: i64,
}

/// Default token expiry in seconds (one hour).
const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 3600;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `JWT_SECRET`            | **yes**  | --      |
    /// | `JWT_TOKEN_EXPIRY_SECS` | no       | `3600`  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let token_expiry_secs: i64 = std::env::var("JWT_TOKEN_EXPIRY_SECS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_SECS.to_string())
            .parse()
            .expect("JWT_TOKEN_EXPIRY_SECS must be a valid i64");

        Self {
            secret,
            token_expiry_secs,
        }
    }
}

/// Generate an HS256 token for the given user.
///
/// The token contains the user id, role, issue time, and expiration.
pub fn generate_token(
    user_id: &ObjectId,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id.clone(),
        role,
        exp: now + config.token_expiry_secs,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically; malformed input
/// fails the same way an invalid signature does.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Time until this token's `exp` claim, used to size revocation TTLs so a
/// revocation entry lapses together with the token it blocks.
///
/// Returns `None` when the token cannot be decoded or has already expired;
/// callers fall back to the full configured lifetime.
pub fn remaining_validity(token: &str, config: &JwtConfig) -> Option<Duration> {
    let mut validation = Validation::default();
    validation.validate_exp = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .ok()?;

    let remaining = data.claims.exp - chrono::Utc::now().timestamp();
    if remaining > 0 {
        Some(Duration::from_secs(remaining as u64))
    } else {
        None
    }
}
