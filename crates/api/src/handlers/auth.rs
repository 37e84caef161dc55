//! Handlers for the `/auth` resource (signup, login, logout).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use tasknest_core::error::CoreError;

use crate::auth::service::{self, SignupInput};
use crate::auth::password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::bearer_token;
use crate::response::{Acknowledgement, CreatedMessage, TokenResponse};
use crate::state::AppState;
use crate::validation;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignupBody {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`. The password only has to match the
/// stored hash here; the registration policy is not re-applied.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Apply the registration rules: non-empty profile fields, a well-formed
/// email, and the password policy.
fn validate_signup(body: SignupBody) -> Result<SignupInput, CoreError> {
    let mut errors = Vec::new();

    if body.username.is_empty() {
        errors.push("Username cannot be empty".to_string());
    }
    if body.first_name.is_empty() {
        errors.push("First name cannot be empty".to_string());
    }
    if body.last_name.is_empty() {
        errors.push("Last name cannot be empty".to_string());
    }
    if let Err(msg) = validation::validate_email(&body.email) {
        errors.push(msg);
    }
    if let Err(mut msgs) = password::validate_password_strength(&body.password) {
        errors.append(&mut msgs);
    }

    if errors.is_empty() {
        Ok(SignupInput {
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password: body.password,
        })
    } else {
        Err(CoreError::Validation {
            context: "Data",
            errors,
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<CreatedMessage>)> {
    let body: SignupBody = validation::parse_body("Data", body)?;
    let input = validate_signup(body)?;

    service::signup(&state.pool, &state.config.jwt, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedMessage {
            message: "User registered successfully",
        }),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<TokenResponse>> {
    let body: LoginBody = validation::parse_body("Data", body)?;
    if let Err(msg) = validation::validate_email(&body.email) {
        return Err(AppError::Core(CoreError::Validation {
            context: "Data",
            errors: vec![msg],
        }));
    }

    let token = service::login(&state.pool, &state.config.jwt, &body.email, &body.password).await?;

    Ok(Json(TokenResponse { token }))
}

/// POST /auth/logout
///
/// Public route; reads its own Authorization header and reports a missing
/// token as a 400.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<Acknowledgement>> {
    let token = bearer_token(&headers).map_err(|_| {
        AppError::Core(CoreError::BadRequest {
            name: "Bad Request",
            message: "Missing authentication token",
        })
    })?;

    service::logout(&state.revocation, &state.config.jwt, token).await;

    Ok(Json(Acknowledgement {
        success: true,
        message: "User logged out successfully",
    }))
}
