//! Signup, login, logout, and token verification flows.
//!
//! Plain functions over injected dependencies. Handlers pass in the pool,
//! the revocation store, and the JWT config from [`crate::state::AppState`];
//! nothing here holds state of its own.

use sqlx::PgPool;
use tasknest_cache::RevocationStore;
use tasknest_core::error::CoreError;
use tasknest_core::types::{ObjectId, Role};
use tasknest_db::models::user::CreateUser;
use tasknest_db::repositories::user_repo::UserRepo;

use crate::auth::jwt::{self, Claims, JwtConfig};
use crate::auth::password;
use crate::error::{AppError, AppResult};

/// Validated signup input. The password is still plaintext; it is hashed
/// here and never stored.
#[derive(Debug)]
pub struct SignupInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Register a new user and issue their first token.
///
/// Username and email are pre-checked for uniqueness. The pre-check is not
/// atomic against concurrent signups; the `uq_users_*` indexes turn the race
/// loser's insert into a 409.
pub async fn signup(
    pool: &PgPool,
    config: &JwtConfig,
    input: SignupInput,
) -> AppResult<(ObjectId, String)> {
    if UserRepo::username_exists(pool, &input.username, None).await? {
        return Err(AppError::Core(CoreError::Conflict {
            name: "User already exists",
            message: "Username already in use",
        }));
    }
    if UserRepo::email_exists(pool, &input.email, None).await? {
        return Err(AppError::Core(CoreError::Conflict {
            name: "Email already exists",
            message: "Email already in use",
        }));
    }

    let password_hash = password::hash_password(&input.password)
        .map_err(|e| AppError::Core(CoreError::Internal(format!("Password hashing failed: {e}"))))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash,
            role: Role::default(),
        },
    )
    .await?;

    let token = jwt::generate_token(&user.id, user.role, config)
        .map_err(|e| AppError::Core(CoreError::Internal(format!("Token generation failed: {e}"))))?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((user.id, token))
}

/// Exchange credentials for a token.
///
/// The issued token is recorded as the user's `current_token`. That column is
/// informational; verification goes through [`verify_token`], not the row.
pub async fn login(
    pool: &PgPool,
    config: &JwtConfig,
    email: &str,
    password_plain: &str,
) -> AppResult<String> {
    let user = UserRepo::find_by_email(pool, email)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            name: "Email not found",
            message: "Not Found",
        }))?;

    let valid = password::verify_password(password_plain, &user.password_hash).map_err(|e| {
        AppError::Core(CoreError::Internal(format!(
            "Password verification failed: {e}"
        )))
    })?;
    if !valid {
        return Err(AppError::Core(CoreError::BadRequest {
            name: "Invalid credentials",
            message: "Invalid email or password",
        }));
    }

    let token = jwt::generate_token(&user.id, user.role, config)
        .map_err(|e| AppError::Core(CoreError::Internal(format!("Token generation failed: {e}"))))?;

    UserRepo::set_current_token(pool, &user.id, &token).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(token)
}

/// Check a bearer token: signature and expiry first, then the revocation
/// store. A logged-out token fails here until its natural expiry.
pub async fn verify_token(
    revocation: &RevocationStore,
    config: &JwtConfig,
    token: &str,
) -> AppResult<Claims> {
    let claims = jwt::validate_token(token, config).map_err(|_| {
        AppError::Core(CoreError::Unauthorized {
            name: "Invalid token",
            message: "The token is not valid",
        })
    })?;

    if revocation.is_revoked(token).await {
        return Err(AppError::Core(CoreError::Unauthorized {
            name: "Invalid token",
            message: "The token has been revoked",
        }));
    }

    Ok(claims)
}

/// Revoke a token for the remainder of its validity.
///
/// Tokens that cannot be decoded (or sit inside the expiry leeway window)
/// are revoked for the full configured lifetime instead.
pub async fn logout(revocation: &RevocationStore, config: &JwtConfig, token: &str) {
    let ttl = jwt::remaining_validity(token, config)
        .unwrap_or_else(|| std::time::Duration::from_secs(config.token_expiry_secs.max(0) as u64));

    revocation.revoke(token, ttl).await;
    tracing::info!("Token revoked");
}

#[cfg(test)]
mod tests {
    use tasknest_cache::{CacheBackend, RevocationStore};
    use tasknest_core::error::CoreError;
    use tasknest_core::types::{ObjectId, Role};

    use super::*;
    use crate::auth::jwt::JwtConfig;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "verify-test-secret".to_string(),
            token_expiry_secs: 3600,
        }
    }

    #[tokio::test]
    async fn verify_accepts_a_fresh_token() {
        let config = test_config();
        let revocation = RevocationStore::new(CacheBackend::memory());
        let id = ObjectId::new();
        let token = jwt::generate_token(&id, Role::User, &config).unwrap();

        let claims = verify_token(&revocation, &config, &token).await.unwrap();
        assert_eq!(claims.sub, id);
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let config = test_config();
        let revocation = RevocationStore::new(CacheBackend::memory());

        let err = verify_token(&revocation, &config, "garbage").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::Unauthorized {
                message: "The token is not valid",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn logout_revokes_until_expiry() {
        let config = test_config();
        let revocation = RevocationStore::new(CacheBackend::memory());
        let token = jwt::generate_token(&ObjectId::new(), Role::User, &config).unwrap();

        logout(&revocation, &config, &token).await;

        let err = verify_token(&revocation, &config, &token).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::Unauthorized {
                message: "The token has been revoked",
                ..
            })
        ));
    }
}
