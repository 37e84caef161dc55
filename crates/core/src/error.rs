/// Domain failure taxonomy shared by every layer.
///
/// The client-facing variants carry the `name`/`message` pair rendered into
/// the HTTP error envelope; `Internal` is the server-side kind and is never
/// shown to callers verbatim.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{name}: {message}")]
    NotFound {
        name: &'static str,
        message: &'static str,
    },

    #[error("{context} validation failed")]
    Validation {
        context: &'static str,
        errors: Vec<String>,
    },

    #[error("Invalid ObjectId")]
    InvalidId,

    #[error("{name}: {message}")]
    Conflict {
        name: &'static str,
        message: &'static str,
    },

    #[error("{name}: {message}")]
    Unauthorized {
        name: &'static str,
        message: &'static str,
    },

    #[error("{name}: {message}")]
    BadRequest {
        name: &'static str,
        message: &'static str,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Operational errors are expected caller-input failures, safe to report
    /// directly; only `Internal` warrants alarm-level logging.
    pub fn is_operational(&self) -> bool {
        !matches!(self, CoreError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_variants_are_operational() {
        let err = CoreError::NotFound {
            name: "Project not found",
            message: "No projects matching the required ID",
        };
        assert!(err.is_operational());
        assert!(CoreError::InvalidId.is_operational());
        assert!(!CoreError::Internal("boom".into()).is_operational());
    }

    #[test]
    fn display_carries_name_and_message() {
        let err = CoreError::Conflict {
            name: "Duplicate project",
            message: "Project of the same name already exists",
        };
        assert_eq!(
            err.to_string(),
            "Duplicate project: Project of the same name already exists"
        );
    }
}
