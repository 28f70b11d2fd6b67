//! Error types for the ORM.

use quill_core::FieldError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// ORM-specific errors.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Database error from sqlx, constraint violations included.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// `get` matched no row.
    #[error("no {model} matches the given criteria")]
    NotFound {
        /// Model name.
        model: &'static str,
    },

    /// `get` matched more than one row.
    #[error("expected one {model}, query returned {count}")]
    MultipleObjectsReturned {
        /// Model name.
        model: &'static str,
        /// Number of rows returned.
        count: usize,
    },

    /// The DELETE statement failed.
    #[error("deletion failed: {0}")]
    DeletionFailed(#[source] sqlx::Error),

    /// The instance has no primary key yet.
    #[error("{model} instance has not been saved")]
    Unsaved {
        /// Model name.
        model: &'static str,
    },

    /// `get` was called without criteria.
    #[error("get on {model} requires at least one criterion")]
    EmptyCriteria {
        /// Model name.
        model: &'static str,
    },

    /// A row could not be turned into an instance.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A selected column has a type the row decoder does not handle.
    #[error("unsupported column type: {0}")]
    UnsupportedType(String),

    /// Missing or invalid connection settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No manager was registered for the model.
    #[error("model {model} is not registered")]
    UnregisteredModel {
        /// Model name.
        model: &'static str,
    },

    /// A global registry was already installed.
    #[error("a model registry is already installed")]
    RegistryInstalled,

    /// No global registry has been installed.
    #[error("no model registry installed")]
    RegistryNotInstalled,
}

impl OrmError {
    /// Returns the constraint violation kind of a backend error, if any.
    #[must_use]
    pub fn constraint_kind(&self) -> Option<ErrorKind> {
        let source = match self {
            Self::Database(source) | Self::DeletionFailed(source) => source,
            _ => return None,
        };
        let kind = source.as_database_error()?.kind();
        match kind {
            ErrorKind::Other => None,
            _ => Some(kind),
        }
    }

    /// Rewraps a backend error raised by a DELETE.
    pub(crate) fn into_deletion_failure(self) -> Self {
        match self {
            Self::Database(source) => Self::DeletionFailed(source),
            other => other,
        }
    }
}

/// Result type alias for ORM operations.
pub type Result<T> = std::result::Result<T, OrmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletion_failure_wraps_backend_errors_only() {
        let err = OrmError::Database(sqlx::Error::RowNotFound).into_deletion_failure();
        assert!(matches!(err, OrmError::DeletionFailed(sqlx::Error::RowNotFound)));

        let err = OrmError::Unsaved { model: "Job" }.into_deletion_failure();
        assert!(matches!(err, OrmError::Unsaved { model: "Job" }));
    }

    #[test]
    fn test_constraint_kind_without_database_error() {
        assert!(OrmError::Database(sqlx::Error::RowNotFound)
            .constraint_kind()
            .is_none());
        assert!(OrmError::RegistryNotInstalled.constraint_kind().is_none());
    }

    #[test]
    fn test_messages() {
        let err = OrmError::MultipleObjectsReturned {
            model: "Job",
            count: 2,
        };
        assert_eq!(err.to_string(), "expected one Job, query returned 2");
        let err = OrmError::NotFound { model: "Message" };
        assert_eq!(err.to_string(), "no Message matches the given criteria");
    }
}
