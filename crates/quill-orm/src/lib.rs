//! # quill-orm
//!
//! A small Django-style model mapper for PostgreSQL, built on sqlx.
//!
//! This crate provides:
//! - `Database`, the shared connection handle
//! - `Manager` for per-model database access
//! - `QuerySet` for lazy, chainable queries
//! - `Registry` to find a model's manager from `Model::objects()`
//!
//! Models are declared with `quill_core`'s `#[derive(Model)]`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use quill_core::{Model, Values};
//! use quill_orm::{Database, DatabaseSettings, ModelInstance, Registry};
//!
//! #[derive(Debug, Model)]
//! struct Job {
//!     id: Option<i64>,
//!     data: String,
//!     #[field(default = true)]
//!     is_active: bool,
//! }
//!
//! async fn example() -> quill_orm::Result<()> {
//!     let db = Database::connect(&DatabaseSettings::from_env()?).await?;
//!     Registry::new(db).register::<Job>().install()?;
//!
//!     Job::objects()?.create_table().await?;
//!     let job = Job::objects()?
//!         .create(Values::new().with("data", "nightly"))
//!         .await?;
//!
//!     let active = Job::objects()?
//!         .filter(Values::new().with("is_active", true))
//!         .order_by(&["-id"]);
//!     assert_eq!(active.count().await?, 1);
//!
//!     job.delete().await?;
//!     Ok(())
//! }
//! ```

mod database;
mod error;
mod manager;
mod model;
mod queryset;
mod registry;
mod row;
mod settings;

pub use database::Database;
pub use error::{OrmError, Result};
pub use manager::Manager;
pub use model::ModelInstance;
pub use queryset::{Iterable, QuerySet, Record};
pub use registry::Registry;
pub use settings::{DatabaseSettings, DEFAULT_HOST, DEFAULT_PORT};

pub use quill_core;
pub use quill_core::{Model, SqlValue, Values};
