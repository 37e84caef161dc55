//! Repository for the `projects` table.

use sqlx::PgPool;
use tasknest_core::types::ObjectId;

use crate::models::project::{CreateProject, Project, ProjectQuery, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, users, status, due_date, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project under a freshly generated id, returning the row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, name, description, users, status, due_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(ObjectId::new())
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.users)
            .bind(input.status)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find a project by id.
    pub async fn find_by_id(pool: &PgPool, id: &ObjectId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching the filter, newest first. Absent filter fields
    /// do not constrain.
    pub async fn find_all(
        pool: &PgPool,
        query: &ProjectQuery,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::TEXT IS NULL OR id = $1)
               AND ($2::TEXT IS NULL OR name = $2)
               AND ($3::TEXT IS NULL OR description = $3)
               AND ($4::TEXT IS NULL OR status = $4)
               AND ($5::TIMESTAMPTZ IS NULL OR due_date = $5)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&sql)
            .bind(query.id.as_ref())
            .bind(query.name.as_deref())
            .bind(query.description.as_deref())
            .bind(query.status)
            .bind(query.due_date)
            .fetch_all(pool)
            .await
    }

    /// First project matching the filter, or `None`.
    pub async fn find_one(
        pool: &PgPool,
        query: &ProjectQuery,
    ) -> Result<Option<Project>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::TEXT IS NULL OR id = $1)
               AND ($2::TEXT IS NULL OR name = $2)
               AND ($3::TEXT IS NULL OR description = $3)
               AND ($4::TEXT IS NULL OR status = $4)
               AND ($5::TIMESTAMPTZ IS NULL OR due_date = $5)
             LIMIT 1"
        );
        sqlx::query_as::<_, Project>(&sql)
            .bind(query.id.as_ref())
            .bind(query.name.as_deref())
            .bind(query.description.as_deref())
            .bind(query.status)
            .bind(query.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &ObjectId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                users = COALESCE($4, users),
                status = COALESCE($5, status),
                due_date = COALESCE($6, due_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.users)
            .bind(input.status)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &ObjectId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a project with this name exists. An empty value never
    /// conflicts; `exclude` skips the record's own row during update checks.
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
                SELECT 1 FROM projects WHERE name = $1 AND ($2::TEXT IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(pool)
        .await
    }
}
