//! Handlers for the `/tasks` resource.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tasknest_core::error::CoreError;
use tasknest_core::types::{ObjectId, Status};
use tasknest_db::models::task::{CreateTask, TaskQuery, UpdateTask};
use tasknest_db::repositories::task_repo::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::respond_cached;
use crate::response::{Acknowledgement, CreatedMessage};
use crate::state::AppState;
use crate::validation;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /tasks/new`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskBody {
    pub name: String,
    pub description: String,
    pub users: Option<Vec<String>>,
    pub project: String,
    pub status: Option<String>,
    pub due_date: String,
}

/// Request body for `PUT /tasks/update/{id}`. Absent fields keep their
/// stored values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub users: Option<Vec<String>>,
    pub project: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// Query parameters for `GET /tasks/find` and `GET /tasks/findmany`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindTaskQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub project: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Apply the create-body rules and build the insert payload.
fn validate_create(body: CreateTaskBody) -> Result<CreateTask, CoreError> {
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

    let project = match validation::parse_id(&body.project) {
        Ok(id) => Some(id),
        Err(msg) => {
            errors.push(msg);
            None
        }
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

    match (errors.is_empty(), project, due_date) {
        (true, Some(project), Some(due_date)) => Ok(CreateTask {
            name: body.name,
            description: body.description,
            users,
            project,
            status,
            due_date,
        }),
        _ => Err(CoreError::Validation {
            context: "Task",
            errors,
        }),
    }
}

/// Translate the wire update body into a partial update.
fn validate_update(body: UpdateTaskBody) -> Result<UpdateTask, CoreError> {
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

    let project = match body.project.as_deref() {
        Some(raw) => match validation::parse_id(raw) {
            Ok(id) => Some(id),
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
        Ok(UpdateTask {
            name: body.name,
            description: body.description,
            users,
            project,
            status,
            due_date,
        })
    } else {
        Err(CoreError::Validation {
            context: "Task",
            errors,
        })
    }
}

/// Translate the wire query into a typed filter.
fn validate_find(query: FindTaskQuery) -> Result<TaskQuery, CoreError> {
    let id = query.id.as_deref().map(ObjectId::parse).transpose()?;
    let project = query.project.as_deref().map(ObjectId::parse).transpose()?;

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

    Ok(TaskQuery {
        id,
        name: query.name,
        description: query.description,
        project,
        status,
        due_date,
    })
}

/// 404 for by-id lookups, updates, and deletes.
fn task_not_found() -> AppError {
    AppError::Core(CoreError::NotFound {
        name: "Task not found",
        message: "No tasks matching the required ID",
    })
}

/// The duplicate-name 409 shared by create and update.
fn duplicate_task() -> AppError {
    AppError::Core(CoreError::Conflict {
        name: "Duplicate task",
        message: "Task of the same name already exists",
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /tasks/new
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<CreatedMessage>)> {
    let body: CreateTaskBody = validation::parse_body("Task", body)?;
    let input = validate_create(body)?;

    if TaskRepo::name_exists(&state.pool, &input.name, None).await? {
        return Err(duplicate_task());
    }

    let task = TaskRepo::create(&state.pool, &input).await?;
    tracing::info!(task_id = %task.id, "Task created");

    state.cache.invalidate("/tasks").await;

    Ok((
        StatusCode::CREATED,
        Json(CreatedMessage {
            message: "Task created successfully",
        }),
    ))
}

/// GET /tasks
///
/// Accepts the same filter fields as `find`; with no parameters the whole
/// collection is returned.
pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<FindTaskQuery>,
) -> AppResult<Response> {
    let filter = validate_find(query)?;

    let tasks = TaskRepo::find_all(&state.pool, &filter).await?;

    let body = json!({
        "success": true,
        "totalResults": tasks.len(),
        "results": tasks,
    });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// GET /tasks/id/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = validation::parse_path_id(&id)?;

    let task = TaskRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(task_not_found)?;

    let body = json!({ "success": true, "task": task });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// GET /tasks/find
pub async fn find(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<FindTaskQuery>,
) -> AppResult<Response> {
    let filter = validate_find(query)?;

    let task = TaskRepo::find_one(&state.pool, &filter)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            name: "Task not found",
            message: "No tasks matching the provided query",
        }))?;

    let body = json!({ "success": true, "task": task });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// GET /tasks/findmany
///
/// Unlike `find`, every match is returned and an empty result set is a
/// success, not a 404.
pub async fn find_many(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<FindTaskQuery>,
) -> AppResult<Response> {
    let filter = validate_find(query)?;

    let tasks = TaskRepo::find_many(&state.pool, &filter).await?;

    let body = json!({
        "success": true,
        "totalResults": tasks.len(),
        "tasks": tasks,
    });
    Ok(respond_cached(&state.cache, &uri, body).await)
}

/// PUT /tasks/update/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let id = validation::parse_path_id(&id)?;
    let body: UpdateTaskBody = validation::parse_body("Task", body)?;
    let input = validate_update(body)?;

    if let Some(name) = input.name.as_deref() {
        if TaskRepo::name_exists(&state.pool, name, Some(&id)).await? {
            return Err(duplicate_task());
        }
    }

    let task = TaskRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(task_not_found)?;

    invalidate_task_keys(&state, &id).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Task updated successfully",
            "task": task,
        })),
    ))
}

/// DELETE /tasks/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Acknowledgement>> {
    let id = validation::parse_path_id(&id)?;

    let deleted = TaskRepo::delete(&state.pool, &id).await?;
    if !deleted {
        return Err(task_not_found());
    }

    invalidate_task_keys(&state, &id).await;

    Ok(Json(Acknowledgement {
        success: true,
        message: "Task deleted successfully",
    }))
}

/// Drop the list and by-id cache entries after a committed mutation.
async fn invalidate_task_keys(state: &AppState, id: &ObjectId) {
    state.cache.invalidate("/tasks").await;
    state
        .cache
        .invalidate(&format!("/tasks/id/{}", id.as_str()))
        .await;
}
