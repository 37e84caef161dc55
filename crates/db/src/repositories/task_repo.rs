//! Repository for the `tasks` table.

use sqlx::PgPool;
use tasknest_core::types::ObjectId;

use crate::models::task::{CreateTask, Task, TaskQuery, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, users, project, status, due_date, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task under a freshly generated id, returning the row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (id, name, description, users, project, status, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(ObjectId::new())
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.users)
            .bind(&input.project)
            .bind(input.status)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find a task by id.
    pub async fn find_by_id(pool: &PgPool, id: &ObjectId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks matching the filter, newest first. Absent filter fields do
    /// not constrain.
    pub async fn find_all(pool: &PgPool, query: &TaskQuery) -> Result<Vec<Task>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1::TEXT IS NULL OR id = $1)
               AND ($2::TEXT IS NULL OR name = $2)
               AND ($3::TEXT IS NULL OR description = $3)
               AND ($4::TEXT IS NULL OR project = $4)
               AND ($5::TEXT IS NULL OR status = $5)
               AND ($6::TIMESTAMPTZ IS NULL OR due_date = $6)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(query.id.as_ref())
            .bind(query.name.as_deref())
            .bind(query.description.as_deref())
            .bind(query.project.as_ref())
            .bind(query.status)
            .bind(query.due_date)
            .fetch_all(pool)
            .await
    }

    /// First task matching the filter, or `None`.
    pub async fn find_one(pool: &PgPool, query: &TaskQuery) -> Result<Option<Task>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1::TEXT IS NULL OR id = $1)
               AND ($2::TEXT IS NULL OR name = $2)
               AND ($3::TEXT IS NULL OR description = $3)
               AND ($4::TEXT IS NULL OR project = $4)
               AND ($5::TEXT IS NULL OR status = $5)
               AND ($6::TIMESTAMPTZ IS NULL OR due_date = $6)
             LIMIT 1"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(query.id.as_ref())
            .bind(query.name.as_deref())
            .bind(query.description.as_deref())
            .bind(query.project.as_ref())
            .bind(query.status)
            .bind(query.due_date)
            .fetch_optional(pool)
            .await
    }

    /// All tasks matching the filter; same semantics as [`TaskRepo::find_all`],
    /// exposed separately for the `/findmany` endpoint.
    pub async fn find_many(pool: &PgPool, query: &TaskQuery) -> Result<Vec<Task>, sqlx::Error> {
        Self::find_all(pool, query).await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &ObjectId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                users = COALESCE($4, users),
                project = COALESCE($5, project),
                status = COALESCE($6, status),
                due_date = COALESCE($7, due_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.users)
            .bind(input.project.as_ref())
            .bind(input.status)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &ObjectId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a task with this name exists. An empty value never conflicts;
    /// `exclude` skips the record's own row during update checks.
    pub async fn name_exists(
        pool: &PgPool,
        name: &str,
        exclude: Option<&ObjectId>,
    ) -> Result<bool, sqlx::Error> {
        if name.is_empty() {
            return Ok(false);
        }
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM tasks WHERE name = $1 AND ($2::TEXT IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(pool)
        .await
    }
}
