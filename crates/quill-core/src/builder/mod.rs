//! SQL statement builders.
//!
//! Every builder renders PostgreSQL text with numbered `$n` placeholders and
//! returns the parameters in placeholder order. Identifiers come from model
//! metadata and are interpolated as-is; values are never interpolated.
//!
//! # Example
//!
//! ```rust
//! use quill_core::builder::Select;
//! use quill_core::Values;
//!
//! let statement = Select::new("messages_message", vec!["id".into(), "content".into()])
//!     .filter(&Values::new().with("count", 3))
//!     .order_by("-id")
//!     .build();
//!
//! assert_eq!(
//!     statement.sql,
//!     "SELECT id, content FROM messages_message WHERE count=$1 ORDER BY id DESC;"
//! );
//! ```

mod ddl;
mod delete;
mod insert;
mod select;
mod update;
pub mod value;

pub use ddl::{create_table, drop_table};
pub use delete::delete;
pub use insert::{insert, insert_from_values};
pub use select::{OrderBy, OrderDirection, Select};
pub use update::update;
pub use value::{FromSqlValue, SqlType, SqlTyped, SqlValue, ToSqlValue};

/// A rendered statement and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with `$n` placeholders.
    pub sql: String,
    /// Parameters, `params[0]` binds to `$1`.
    pub params: Vec<SqlValue>,
}

impl Statement {
    #[must_use]
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A statement without parameters.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Returns the placeholder for the 1-based parameter `index`.
pub(crate) fn placeholder(index: usize) -> String {
    format!("${index}")
}
