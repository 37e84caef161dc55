//! Task entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tasknest_core::types::{ObjectId, Status, Timestamp};

/// Full task row from the `tasks` table.
///
/// `project` and `users` are plain ObjectIds, not enforced references.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub users: Vec<ObjectId>,
    pub project: ObjectId,
    pub status: Status,
    pub due_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload, validated by the handler layer.
#[derive(Debug)]
pub struct CreateTask {
    pub name: String,
    pub description: String,
    pub users: Vec<ObjectId>,
    pub project: ObjectId,
    pub status: Status,
    pub due_date: Timestamp,
}

/// Partial update. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub users: Option<Vec<ObjectId>>,
    pub project: Option<ObjectId>,
    pub status: Option<Status>,
    pub due_date: Option<Timestamp>,
}

/// Filter for `find_all`/`find_one`/`find_many`. Absent fields do not
/// constrain.
#[derive(Debug, Default)]
pub struct TaskQuery {
    pub id: Option<ObjectId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub project: Option<ObjectId>,
    pub status: Option<Status>,
    pub due_date: Option<Timestamp>,
}
