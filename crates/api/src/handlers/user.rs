//! Handlers for the `/users` resource.
//!
//! Users are created through `/auth/signup`; this resource covers reads,
//! profile updates, and deletion. Every response path goes through
//! [`UserResponse`] so the password hash never leaves the database layer.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tasknest_core::error::CoreError;
use tasknest_core::types::ObjectId;
use tasknest_db::models::user::{UpdateUser, UserQuery, UserResponse};
use tasknest_db::repositories::user_repo::UserRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::respond_cached;
use crate::response::Acknowledgement;
use crate::state::AppState;
use crate::validation;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /users/update/{id}`. Absent fields keep their
/// stored values; credentials and role are not updatable here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Query parameters for `GET /users/find`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindUserQuery {
    pub id: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Translate the wire query into a typed filter.
///
/// A malformed `id` is a plain 400; other rule violations collect into a
/// 406 under the "Query" context.
fn validate_find(query: FindUserQuery) -> Result<UserQuery, CoreError> {
    let id = query.id.as_deref().map(ObjectId::parse).transpose()?;

    let mut errors = Vec::new();

    if let Some(email) = query.email.as_deref() {
        if let Err(msg) = validation::validate_email(email) {
            errors.push(msg);
        }
    }

    let role = match query.role.as_deref() {
        Some(raw) => match validation::parse_role(raw) {
            Ok(role) => Some(role),
            Err(msg) => {
                errors.push(msg);
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        return Err(CoreError::Validation {
            context: "Query",
            errors,
        });
    }

    Ok(UserQuery {
        id,
        username: query.username,
        first_name: query.first_name,
        last_name: query.last_name,
        email: query.email,
        role,
    })
}

/// Translate the wire update body into a partial update.
fn validate_update(body: UpdateUserBody) -> Result<UpdateUser, CoreError> {
    let mut errors = Vec::new();

    if let Some(email) = body.email.as_deref() {
        if let Err(msg) = validation::validate_email(email) {
            errors.push(msg);
        }
    }

    if errors.is_empty() {
        Ok(UpdateUser {
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
        })
    } else {
        Err(CoreError::Validation {
            context: "Data",
            errors,
        })
    }
}

/// The uniform 404 for this resource.
fn user_not_found() -> AppError {
    AppError::Core(CoreError::NotFound {
        name: "User not found",
        message: "No users matching the provided ID",
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /users
///
/// Accepts the same filter fields as `find`; with no parameters the whole
/// collection is returned.
pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<FindUserQuery>,
) -> AppResult<Response> {
    let filter = validate_find(query)?;

    let users = UserRepo::find_all(&state.pool, &filter).await?;
    let results: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    let body = json!({
        "success": true,
        "totalResults": results.len(),
        "results": results,
    });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// GET /users/id/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = validation::parse_path_id(&id)?;

    let user = UserRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(user_not_found)?;

    let body = json!({ "success": true, "user": UserResponse::from(user) });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// GET /users/find
pub async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<FindUserQuery>,
) -> AppResult<Response> {
    let filter = validate_find(query)?;

    let user = UserRepo::find_one(&state.pool, &filter)
        .await?
        .ok_or_else(user_not_found)?;

    let body = json!({ "success": true, "user": UserResponse::from(user) });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// PUT /users/update/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let id = validation::parse_path_id(&id)?;
    let body: UpdateUserBody = validation::parse_body("Data", body)?;
    let input = validate_update(body)?;

    if let Some(username) = input.username.as_deref() {
        if UserRepo::username_exists(&state.pool, username, Some(&id)).await? {
            return Err(AppError::Core(CoreError::Conflict {
                name: "User already exists",
                message: "Username already in use",
            }));
        }
    }
    if let Some(email) = input.email.as_deref() {
        if UserRepo::email_exists(&state.pool, email, Some(&id)).await? {
            return Err(AppError::Core(CoreError::Conflict {
                name: "Email already exists",
                message: "Please try a different email address",
            }));
        }
    }

    let user = UserRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(user_not_found)?;

    invalidate_user_keys(&state, &id).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User updated successfully",
            "user": UserResponse::from(user),
        })),
    ))
}

/// DELETE /users/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Acknowledgement>> {
    let id = validation::parse_path_id(&id)?;

    let deleted = UserRepo::delete(&state.pool, &id).await?;
    if !deleted {
        return Err(user_not_found());
    }

    invalidate_user_keys(&state, &id).await;

    Ok(Json(Acknowledgement {
        success: true,
        message: "User deleted successfully",
    }))
}

/// Drop the list and by-id cache entries after a committed mutation.
async fn invalidate_user_keys(state: &AppState, id: &ObjectId) {
    state.cache.invalidate("/users").await;
    state
        .cache
        .invalidate(&format!("/users/id/{}", id.as_str()))
        .await;
}
