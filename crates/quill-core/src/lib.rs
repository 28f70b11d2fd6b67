//! # quill-core
//!
//! Field descriptors, model metadata and SQL statement builders for the quill
//! model mapper. Nothing in this crate touches a database; it renders
//! PostgreSQL statements with `$n` placeholders that `quill-orm` executes.
//!
//! Models are ordinary structs deriving [`Model`]:
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use quill_core::{Model, Values};
//!
//! #[derive(Debug, Model)]
//! struct Job {
//!     id: Option<i64>,
//!     data: String,
//! }
//!
//! #[derive(Debug, Model)]
//! struct Message {
//!     id: Option<i64>,
//!     content: String,
//!     date_created: Option<DateTime<Utc>>,
//!     #[field(foreign_key = Job, on_delete = "SET NULL")]
//!     job: Option<i64>,
//! }
//!
//! let statement = Message::insert_from_values(&Values::new().with("content", "hi"));
//! assert_eq!(
//!     statement.sql,
//!     "INSERT INTO messages_message (content, date_created, job_id) \
//!      VALUES ($1, $2, $3) RETURNING id;"
//! );
//! ```

extern crate self as quill_core;

pub mod builder;
mod error;
pub mod fields;
mod meta;
mod model;
mod values;

pub use builder::{
    FromSqlValue, OrderBy, Select, SqlType, SqlTyped, SqlValue, Statement, ToSqlValue,
};
pub use error::{FieldError, ValueError};
pub use meta::{FieldMeta, ModelMeta};
pub use model::Model;
pub use quill_derive::Model;
pub use values::Values;
