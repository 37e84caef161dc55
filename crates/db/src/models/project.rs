//! Project entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tasknest_core::types::{ObjectId, Status, Timestamp};

/// Full project row from the `projects` table.
///
/// `users` holds member ObjectIds without referential enforcement; a deleted
/// user leaves a dangling id behind.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub users: Vec<ObjectId>,
    pub status: Status,
    pub due_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload, validated by the handler layer.
#[derive(Debug)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    pub users: Vec<ObjectId>,
    pub status: Status,
    pub due_date: Timestamp,
}

/// Partial update. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub users: Option<Vec<ObjectId>>,
    pub status: Option<Status>,
    pub due_date: Option<Timestamp>,
}

/// Filter for `find_all`/`find_one`. Absent fields do not constrain.
#[derive(Debug, Default)]
pub struct ProjectQuery {
    pub id: Option<ObjectId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub due_date: Option<Timestamp>,
}
