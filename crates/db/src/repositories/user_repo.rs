//! Repository for the `users` table.

use sqlx::PgPool;
use tasknest_core::types::ObjectId;

use crate::models::user::{CreateUser, UpdateUser, User, UserQuery};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, first_name, last_name, email, password_hash, \
                       current_token, role, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user under a freshly generated id, returning the row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, username, first_name, last_name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(ObjectId::new())
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: &ObjectId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users matching the filter, newest first. Absent filter fields do
    /// not constrain.
    pub async fn find_all(pool: &PgPool, query: &UserQuery) -> Result<Vec<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::TEXT IS NULL OR id = $1)
               AND ($2::TEXT IS NULL OR username = $2)
               AND ($3::TEXT IS NULL OR first_name = $3)
               AND ($4::TEXT IS NULL OR last_name = $4)
               AND ($5::TEXT IS NULL OR email = $5)
               AND ($6::TEXT IS NULL OR role = $6)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(query.id.as_ref())
            .bind(query.username.as_deref())
            .bind(query.first_name.as_deref())
            .bind(query.last_name.as_deref())
            .bind(query.email.as_deref())
            .bind(query.role)
            .fetch_all(pool)
            .await
    }

    /// First user matching the filter, or `None`.
    pub async fn find_one(pool: &PgPool, query: &UserQuery) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::TEXT IS NULL OR id = $1)
               AND ($2::TEXT IS NULL OR username = $2)
               AND ($3::TEXT IS NULL OR first_name = $3)
               AND ($4::TEXT IS NULL OR last_name = $4)
               AND ($5::TEXT IS NULL OR email = $5)
               AND ($6::TEXT IS NULL OR role = $6)
             LIMIT 1"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(query.id.as_ref())
            .bind(query.username.as_deref())
            .bind(query.first_name.as_deref())
            .bind(query.last_name.as_deref())
            .bind(query.email.as_deref())
            .bind(query.role)
            .fetch_optional(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &ObjectId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &ObjectId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the most recently issued token after a successful login.
    pub async fn set_current_token(
        pool: &PgPool,
        id: &ObjectId,
        token: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET current_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Whether a user with this username exists. An empty value never
    /// conflicts; `exclude` skips the record's own row during update checks.
    pub async fn username_exists(
        pool: &PgPool,
        username: &str,
        exclude: Option<&ObjectId>,
    ) -> Result<bool, sqlx::Error> {
        if username.is_empty() {
            return Ok(false);
        }
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM users WHERE username = $1 AND ($2::TEXT IS NULL OR id <> $2)
             )",
        )
        .bind(username)
        .bind(exclude)
        .fetch_one(pool)
        .await
    }

    /// Whether a user with this email exists, with the same empty-value and
    /// `exclude` semantics as [`UserRepo::username_exists`].
    pub async fn email_exists(
        pool: &PgPool,
        email: &str,
        exclude: Option<&ObjectId>,
    ) -> Result<bool, sqlx::Error> {
        if email.is_empty() {
            return Ok(false);
        }
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM users WHERE email = $1 AND ($2::TEXT IS NULL OR id <> $2)
             )",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(pool)
        .await
    }
}
