//! Model registry.
//!
//! A `Registry` holds one [`Manager`] per registered model type, all sharing
//! one [`Database`]. Installing it makes it process-global so that
//! `M::objects()` can find the manager for `M`.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use quill_core::{Model, ModelMeta};
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{OrmError, Result};
use crate::manager::Manager;

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Maps model types to their managers.
///
/// # Example
///
/// ```ignore
/// let db = Database::connect(&DatabaseSettings::from_env()?).await?;
/// Registry::new(db)
///     .register::<Job>()
///     .register::<Message>()
///     .install()?;
///
/// let jobs = Job::objects()?.all();
/// ```
pub struct Registry {
    db: Database,
    managers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    models: Vec<&'static ModelMeta>,
}

impl Registry {
    /// Creates an empty registry over `db`.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            db,
            managers: HashMap::new(),
            models: Vec::new(),
        }
    }

    /// Registers `M`, building its metadata.
    ///
    /// Registering the same model twice keeps a single entry.
    #[must_use]
    pub fn register<M: Model>(mut self) -> Self {
        let meta = M::meta();
        let manager = Manager::<M>::new(self.db.clone());
        if self
            .managers
            .insert(TypeId::of::<M>(), Box::new(manager))
            .is_none()
        {
            self.models.push(meta);
        }
        debug!(
            model = M::NAME,
            table = meta.table(),
            fields = meta.fields().len(),
            "registered model"
        );
        self
    }

    /// Returns the manager of `M`.
    ///
    /// # Errors
    ///
    /// [`OrmError::UnregisteredModel`] when `M` was never registered.
    pub fn manager<M: Model>(&self) -> Result<Manager<M>> {
        self.managers
            .get(&TypeId::of::<M>())
            .and_then(|manager| manager.downcast_ref::<Manager<M>>())
            .cloned()
            .ok_or(OrmError::UnregisteredModel { model: M::NAME })
    }

    #[must_use]
    pub fn is_registered<M: Model>(&self) -> bool {
        self.managers.contains_key(&TypeId::of::<M>())
    }

    /// Metadata of the registered models, in registration order.
    #[must_use]
    pub fn models(&self) -> &[&'static ModelMeta] {
        &self.models
    }

    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// Creates every registered table, in registration order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing statement and returns its error.
    pub async fn create_tables(&self) -> Result<()> {
        for meta in &self.models {
            self.db
                .execute_ddl(&quill_core::builder::create_table(meta))
                .await?;
        }
        Ok(())
    }

    /// Drops every registered table, in reverse registration order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing statement and returns its error.
    pub async fn drop_tables(&self) -> Result<()> {
        for meta in self.models.iter().rev() {
            self.db
                .execute_ddl(&quill_core::builder::drop_table(meta))
                .await?;
        }
        Ok(())
    }

    /// Makes this registry process-global.
    ///
    /// # Errors
    ///
    /// [`OrmError::RegistryInstalled`] when one is already installed.
    pub fn install(self) -> Result<&'static Self> {
        let count = self.models.len();
        GLOBAL.set(self).map_err(|_| OrmError::RegistryInstalled)?;
        info!(models = count, "model registry installed");
        Self::global()
    }

    /// Returns the installed registry.
    ///
    /// # Errors
    ///
    /// [`OrmError::RegistryNotInstalled`] before [`Registry::install`].
    pub fn global() -> Result<&'static Self> {
        GLOBAL.get().ok_or(OrmError::RegistryNotInstalled)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("db", &self.db)
            .field(
                "models",
                &self.models.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
