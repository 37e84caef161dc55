//! Handlers for the `/projects` resource.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tasknest_core::error::CoreError;
use tasknest_core::types::{ObjectId, Status};
use tasknest_db::models::project::{CreateProject, ProjectQuery, UpdateProject};
use tasknest_db::repositories::project_repo::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::respond_cached;
use crate::response::{Acknowledgement, CreatedMessage};
use crate::state::AppState;
use crate::validation;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects/new`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProjectBody {
    pub name: String,
    pub description: String,
    pub users: Option<Vec<String>>,
    pub status: Option<String>,
    pub due_date: String,
}

/// Request body for `PUT /projects/update/{id}`. Absent fields keep their
/// stored values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub users: Option<Vec<String>>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// Query parameters for `GET /projects/find`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindProjectQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Apply the create-body rules and build the insert payload.
fn validate_create(body: CreateProjectBody) -> Result<CreateProject, CoreError> {
    let mut errors = Vec::new();

    if body.name.is_empty() {
        errors.push("Name cannot be empty".to_string());
    }
    if body.description.is_empty() {
        errors.push("Description cannot be empty".to_string());
    }

    let users = match body.users {
        Some(raw) => match validation::parse_ids(&raw) {
            Ok(ids) => ids,
            Err(msg) => {
                errors.push(msg);
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let status = match body.status.as_deref() {
        Some(raw) => match validation::parse_status(raw) {
            Ok(status) => status,
            Err(msg) => {
                errors.push(msg);
                Status::default()
            }
        },
        None => Status::default(),
    };

    let due_date = match validation::parse_due_date(&body.due_date) {
        Ok(ts) => Some(ts),
        Err(msg) => {
            errors.push(msg);
            None
        }
    };

    match (errors.is_empty(), due_date) {
        (true, Some(due_date)) => Ok(CreateProject {
            name: body.name,
            description: body.description,
            users,
            status,
            due_date,
        }),
        _ => Err(CoreError::Validation {
            context: "Project",
            errors,
        }),
    }
}

/// Translate the wire update body into a partial update.
fn validate_update(body: UpdateProjectBody) -> Result<UpdateProject, CoreError> {
    let mut errors = Vec::new();

    let users = match body.users {
        Some(raw) => match validation::parse_ids(&raw) {
            Ok(ids) => Some(ids),
            Err(msg) => {
                errors.push(msg);
                None
            }
        },
        None => None,
    };

    let status = match body.status.as_deref() {
        Some(raw) => match validation::parse_status(raw) {
            Ok(status) => Some(status),
            Err(msg) => {
                errors.push(msg);
                None
            }
        },
        None => None,
    };

    let due_date = match body.due_date.as_deref() {
        Some(raw) => match validation::parse_due_date(raw) {
            Ok(ts) => Some(ts),
            Err(msg) => {
                errors.push(msg);
                None
            }
        },
        None => None,
    };

    if errors.is_empty() {
        Ok(UpdateProject {
            name: body.name,
            description: body.description,
            users,
            status,
            due_date,
        })
    } else {
        Err(CoreError::Validation {
            context: "Project",
            errors,
        })
    }
}

/// Translate the wire query into a typed filter.
fn validate_find(query: FindProjectQuery) -> Result<ProjectQuery, CoreError> {
    let id = query.id.as_deref().map(ObjectId::parse).transpose()?;

    let mut errors = Vec::new();

    let status = match query.status.as_deref() {
        Some(raw) => match validation::parse_status(raw) {
            Ok(status) => Some(status),
            Err(msg) => {
                errors.push(msg);
                None
            }
        },
        None => None,
    };

    let due_date = match query.due_date.as_deref() {
        Some(raw) => match validation::parse_due_date(raw) {
            Ok(ts) => Some(ts),
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

    Ok(ProjectQuery {
        id,
        name: query.name,
        description: query.description,
        status,
        due_date,
    })
}

/// 404 for by-id lookups, updates, and deletes.
fn project_not_found() -> AppError {
    AppError::Core(CoreError::NotFound {
        name: "Project not found",
        message: "No projects matching the required ID",
    })
}

/// The duplicate-name 409 shared by create and update.
fn duplicate_project() -> AppError {
    AppError::Core(CoreError::Conflict {
        name: "Duplicate project",
        message: "Project of the same name already exists",
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /projects/new
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<CreatedMessage>)> {
    let body: CreateProjectBody = validation::parse_body("Project", body)?;
    let input = validate_create(body)?;

    if ProjectRepo::name_exists(&state.pool, &input.name, None).await? {
        return Err(duplicate_project());
    }

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = %project.id, "Project created");

    state.cache.invalidate("/projects").await;

    Ok((
        StatusCode::CREATED,
        Json(CreatedMessage {
            message: "Project created successfully",
        }),
    ))
}

/// GET /projects
///
/// Accepts the same filter fields as `find`; with no parameters the whole
/// collection is returned.
pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<FindProjectQuery>,
) -> AppResult<Response> {
    let filter = validate_find(query)?;

    let projects = ProjectRepo::find_all(&state.pool, &filter).await?;

    let body = json!({
        "success": true,
        "totalResults": projects.len(),
        "results": projects,
    });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// GET /projects/id/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = validation::parse_path_id(&id)?;

    let project = ProjectRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(project_not_found)?;

    let body = json!({ "success": true, "project": project });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// GET /projects/find
pub async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<FindProjectQuery>,
) -> AppResult<Response> {
    let filter = validate_find(query)?;

    let project = ProjectRepo::find_one(&state.pool, &filter)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            name: "Project not found",
            message: "No projects matching the provided query",
        }))?;

    let body = json!({ "success": true, "project": project });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// PUT /projects/update/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let id = validation::parse_path_id(&id)?;
    let body: UpdateProjectBody = validation::parse_body("Project", body)?;
    let input = validate_update(body)?;

    if let Some(name) = input.name.as_deref() {
        if ProjectRepo::name_exists(&state.pool, name, Some(&id)).await? {
            return Err(duplicate_project());
        }
    }

    let project = ProjectRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(project_not_found)?;

    invalidate_project_keys(&state, &id).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Project updated successfully",
            "project": project,
        })),
    ))
}

/// DELETE /projects/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Acknowledgement>> {
    let id = validation::parse_path_id(&id)?;

    let deleted = ProjectRepo::delete(&state.pool, &id).await?;
    if !deleted {
        return Err(project_not_found());
    }

    invalidate_project_keys(&state, &id).await;

    Ok(Json(Acknowledgement {
        success: true,
        message: "Project deleted successfully",
    }))
}

/// Drop the list and by-id cache entries after a committed mutation.
async fn invalidate_project_keys(state: &AppState, id: &ObjectId) {
    state.cache.invalidate("/projects").await;
    state
        .cache
        .invalidate(&format!("/projects/id/{}", id.as_str()))
        .await;
}
