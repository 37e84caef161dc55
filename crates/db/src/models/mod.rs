//! Entity models: full table rows, response shapes, and the payloads the
//! repositories accept for inserts, partial updates, and filtered reads.

pub mod project;
pub mod task;
pub mod user;
