//! Error types for model metadata and value conversion.

use thiserror::Error;

/// A `SqlValue` could not be converted into the requested Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// NULL was found where the Rust type cannot hold it.
    #[error("unexpected NULL")]
    UnexpectedNull,

    /// The value has a different SQL type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected type name.
        expected: &'static str,
        /// Actual type name.
        found: &'static str,
    },

    /// An integer does not fit the target width.
    #[error("integer {0} is out of range")]
    OutOfRange(i64),
}

/// Field access on a model instance failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The model declares no such column.
    #[error("model {model} has no field `{field}`")]
    UnknownField {
        /// Model name.
        model: &'static str,
        /// Requested field or column.
        field: String,
    },

    /// A value could not be stored in the column's Rust field.
    #[error("invalid value for {model}.{column}: {source}")]
    InvalidValue {
        /// Model name.
        model: &'static str,
        /// Column name.
        column: &'static str,
        /// Conversion failure.
        #[source]
        source: ValueError,
    },
}

impl FieldError {
    /// Builds an `UnknownField` error.
    #[must_use]
    pub fn unknown(model: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            model,
            field: field.into(),
        }
    }

    /// Builds an `InvalidValue` error.
    #[must_use]
    pub const fn invalid(model: &'static str, column: &'static str, source: ValueError) -> Self {
        Self::InvalidValue {
            model,
            column,
            source,
        }
    }
}
