use crate::db::errors::DbError;
use crate::validate::FieldError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Malformed input shape; carries field-level messages
    #[error("Validation failed")]
    Validation { errors: Vec<FieldError> },

    /// Referenced student/plan/enrollment/user absent
    #[error("{resource} does not exist")]
    NotFound { resource: &'static str },

    /// Duplicate active enrollment, or a uniqueness collision in the CRUD layer
    #[error("{message}")]
    Conflict { message: String },

    /// Enrollment start date strictly before the current day
    #[error("{message}")]
    InvalidDate { message: String },

    /// Attempt to reassign an enrollment to a different student
    #[error("Enrollments cannot be moved to another student")]
    OwnershipViolation,

    /// Authentication required but not provided or invalid
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Check-in identity mismatch between path and payload
    #[error("{message}")]
    Unauthorized { message: String },

    /// Check-in instant outside every membership window
    #[error("Incompatible date to check in")]
    OutOfWindow,

    /// Weekly check-in ceiling already reached
    #[error("Student already checked in {limit} times this week")]
    QuotaExceeded { limit: u32 },

    /// Daily check-in ceiling already reached
    #[error("Student already checked in today")]
    AlreadyCheckedInToday,

    /// Invalid request data outside the named constraint sets
    #[error("{message}")]
    BadRequest { message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } | Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Error::Validation { .. }
            | Error::NotFound { .. }
            | Error::Conflict { .. }
            | Error::InvalidDate { .. }
            | Error::OwnershipViolation
            | Error::OutOfWindow
            | Error::QuotaExceeded { .. }
            | Error::AlreadyCheckedInToday
            | Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::BAD_REQUEST,
                DbError::UniqueViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { constraint, table, .. } => {
                    // Provide user-friendly messages for common unique constraint violations
                    match (table.as_deref(), constraint.as_deref()) {
                        (Some("users"), Some(c)) if c.contains("email") => "User already exists".to_string(),
                        (Some("students"), Some(c)) if c.contains("email") => "Student already exists".to_string(),
                        (Some("plans"), Some(c)) if c.contains("title") => "This plan already exists".to_string(),
                        (Some("enrollments"), Some("enrollments_one_active_per_student")) => {
                            "The student is already enrolled".to_string()
                        }
                        _ => "Resource already exists".to_string(),
                    }
                }
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Internal { .. } | Error::Other(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::Unauthorized { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::Conflict { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
            _ => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        // Validation failures carry the accumulated field messages; everything
        // else collapses to a single `error` field.
        let body = match &self {
            Error::Validation { errors } => json!({ "errors": errors }),
            _ => json!({ "error": self.user_message() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::Unauthorized {
                message: "bad id".to_string()
            }
            .status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::Unauthenticated { message: None }.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::OutOfWindow.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::QuotaExceeded { limit: 5 }.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::AlreadyCheckedInToday.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::NotFound { resource: "Student" }.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::Internal {
                operation: "x".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unique_violation_messages() {
        let err = Error::Database(DbError::UniqueViolation {
            constraint: Some("students_email_unique".to_string()),
            table: Some("students".to_string()),
            message: "duplicate key".to_string(),
        });
        assert_eq!(err.user_message(), "Student already exists");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = Error::Other(anyhow::anyhow!("connection refused to 10.0.0.3:5432"));
        assert_eq!(err.user_message(), "Internal server error");
    }
}
