//! Instance methods backed by the global registry.

use quill_core::Model;

use crate::error::Result;
use crate::manager::Manager;
use crate::registry::Registry;

/// Django-style access to a model's manager and instance persistence.
///
/// Implemented for every [`Model`]. All methods go through the manager of
/// the installed [`Registry`] and fail with
/// [`OrmError::RegistryNotInstalled`](crate::OrmError::RegistryNotInstalled)
/// or [`OrmError::UnregisteredModel`](crate::OrmError::UnregisteredModel)
/// when it cannot be found.
///
/// # Example
///
/// ```ignore
/// use quill_orm::ModelInstance;
///
/// let mut job = Job::from_values(Values::new().with("data", "nightly"))?;
/// job.save().await?;
/// assert!(job.id.is_some());
///
/// let jobs = Job::objects()?.all();
/// job.delete().await?;
/// ```
#[allow(async_fn_in_trait)]
pub trait ModelInstance: Model {
    /// Returns the registered manager for this model.
    ///
    /// # Errors
    ///
    /// Registry lookup failures, as described on the trait.
    fn objects() -> Result<Manager<Self>> {
        Registry::global()?.manager::<Self>()
    }

    /// Inserts this instance, or updates it when it already has an id.
    ///
    /// # Errors
    ///
    /// Registry lookup failures and [`Manager::save`] errors.
    async fn save(&mut self) -> Result<()> {
        Self::objects()?.save(self).await
    }

    /// Deletes the stored row.
    ///
    /// # Errors
    ///
    /// Registry lookup failures and [`Manager::delete`] errors.
    async fn delete(&self) -> Result<()> {
        Self::objects()?.delete(self).await
    }

    /// Reloads every column from the stored row.
    ///
    /// # Errors
    ///
    /// Registry lookup failures and [`Manager::refresh`] errors.
    async fn refresh_from_db(&mut self) -> Result<()> {
        Self::objects()?.refresh(self).await
    }
}

impl<M: Model> ModelInstance for M {}
