//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Uniqueness pre-checks go
//! through the `*_exists` methods; the `uq_*` unique indexes remain the
//! authoritative backstop under concurrent writers.

pub mod project_repo;
pub mod task_repo;
pub mod user_repo;
