//! Request validation helpers shared across handlers.
//!
//! Rule violations render as 406 envelopes carrying a per-rule error list;
//! the context string names the validation family shown in the envelope
//! message ("Data", "Query", "ID", "Project", "Task"). Id-shaped query
//! fields are the exception: those fail as a plain 400 via
//! [`CoreError::InvalidId`].

use serde::de::DeserializeOwned;
use tasknest_core::error::CoreError;
use tasknest_core::types::{ObjectId, Role, Status, Timestamp};
use validator::ValidateEmail;

/// Accepted status values, as they appear on the wire.
pub const VALID_STATUSES: [&str; 3] = ["Pending", "In Progress", "Completed"];

/// Accepted role values, as they appear on the wire.
pub const VALID_ROLES: [&str; 3] = ["USER", "MANAGER", "ADMIN"];

/// Parse a JSON body into a typed DTO.
///
/// Missing required fields, type mismatches, and unknown fields (where the
/// DTO opts in via `deny_unknown_fields`) surface as a validation failure
/// under the given context.
pub fn parse_body<T: DeserializeOwned>(
    context: &'static str,
    value: serde_json::Value,
) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::Validation {
        context,
        errors: vec![e.to_string()],
    })
}

/// Validate a path `{id}` parameter as a 24-hex ObjectId.
pub fn parse_path_id(raw: &str) -> Result<ObjectId, CoreError> {
    ObjectId::parse(raw).map_err(|_| CoreError::Validation {
        context: "ID",
        errors: vec!["Invalid ObjectId format".to_string()],
    })
}

/// Validate an id-shaped body field.
pub fn parse_id(raw: &str) -> Result<ObjectId, String> {
    ObjectId::parse(raw).map_err(|_| "Invalid ObjectId format".to_string())
}

/// Validate an id-array body field (`users`). Reports the first bad entry.
pub fn parse_ids(raw: &[String]) -> Result<Vec<ObjectId>, String> {
    raw.iter().map(|s| parse_id(s)).collect()
}

/// Parse a status value against [`VALID_STATUSES`].
pub fn parse_status(raw: &str) -> Result<Status, String> {
    match raw {
        "Pending" => Ok(Status::Pending),
        "In Progress" => Ok(Status::InProgress),
        "Completed" => Ok(Status::Completed),
        _ => Err(format!(
            "Status must be one of: {}",
            VALID_STATUSES.join(", ")
        )),
    }
}

/// Parse a role value against [`VALID_ROLES`].
pub fn parse_role(raw: &str) -> Result<Role, String> {
    match raw {
        "USER" => Ok(Role::User),
        "MANAGER" => Ok(Role::Manager),
        "ADMIN" => Ok(Role::Admin),
        _ => Err(format!("Role must be one of: {}", VALID_ROLES.join(", "))),
    }
}

/// Parse a due date: RFC 3339 first, then a bare `YYYY-MM-DD` taken as
/// midnight UTC.
pub fn parse_due_date(raw: &str) -> Result<Timestamp, String> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&chrono::Utc));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err("dueDate must be in ISO 8601 date format".to_string())
}

/// Email format check used by signup, login, user update, and user queries.
pub fn validate_email(raw: &str) -> Result<(), String> {
    if raw.validate_email() {
        Ok(())
    } else {
        Err("Email must be a valid email address".to_string())
    }
}
