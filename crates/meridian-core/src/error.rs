//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Meridian.
///
/// Covers domain, persistence, cache, and object-storage failures. The
/// `Rollback` variant is the double-fault case: a mutation failed and the
/// compensating action failed too, so both errors are carried together.
#[derive(Error, Debug)]
pub enum MeridianError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Per-user photo ceiling would be exceeded; rejected before any I/O.
    #[error("Photo limit exceeded: {current} stored + {incoming} new exceeds limit of {limit}")]
    PhotoLimitExceeded {
        current: u64,
        incoming: u64,
        limit: u64,
    },

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Blob store error
    #[error("Object storage error: {0}")]
    ObjectStorage(String),

    /// Timeout error (e.g., object existence wait)
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Compensation Errors ============
    /// A mutation failed and its compensating action failed as well.
    /// Both failures are reported; neither is ever dropped.
    #[error("{operation} failed: {cause}; compensating rollback also failed: {rollback}")]
    Rollback {
        operation: &'static str,
        cause: Box<MeridianError>,
        rollback: Box<MeridianError>,
    },

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MeridianError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::PhotoLimitExceeded { .. } => 400,
            Self::Conflict(_) => 409,
            Self::Timeout(_) => 503,
            Self::ObjectStorage(_) => 502,
            Self::Database(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Rollback { .. }
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::PhotoLimitExceeded { .. } => "PHOTO_LIMIT_EXCEEDED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::ObjectStorage(_) => "OBJECT_STORAGE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Rollback { .. } => "ROLLBACK_FAILED",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a double-fault error from a failed mutation and its failed
    /// compensation.
    #[must_use]
    pub fn rollback(operation: &'static str, cause: Self, rollback: Self) -> Self {
        Self::Rollback {
            operation,
            cause: Box::new(cause),
            rollback: Box::new(rollback),
        }
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Cache(_) | Self::ObjectStorage(_) | Self::Timeout(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for MeridianError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique violation
                if let Some(code) = db_err.code() {
                    if code == "23505" {
                        return Self::Conflict(db_err.message().to_string());
                    }
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for MeridianError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `MeridianError`.
    #[must_use]
    pub fn from_error(error: &MeridianError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&MeridianError> for ErrorResponse {
    fn from(error: &MeridianError) -> Self {
        Self::from_error(error)
    }
}
