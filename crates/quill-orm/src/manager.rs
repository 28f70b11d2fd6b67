//! Manager for database access.
//!
//! The Manager provides the primary interface for database operations on one
//! model type, similar to Django's Manager class.

use std::fmt;
use std::marker::PhantomData;

use quill_core::{FieldError, Model, Values};
use tracing::info;

use crate::database::Database;
use crate::error::{OrmError, Result};
use crate::queryset::QuerySet;

/// A Manager provides database access methods for a Model.
///
/// `all`, `filter`, `values` and `values_list` return lazy querysets; every
/// other operation runs immediately. Writes commit before returning.
///
/// # Example
///
/// ```ignore
/// let jobs = Manager::<Job>::new(db);
///
/// let job = jobs.create(Values::new().with("data", "nightly")).await?;
/// let same = jobs.get(Values::new().with("id", job.id)).await?;
/// let active = jobs.filter(Values::new().with("is_active", true));
/// for job in active.iter().await? {
///     println!("{:?}", job.as_instance());
/// }
/// ```
pub struct Manager<M: Model> {
    db: Database,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Model> Clone for Manager<M> {
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

impl<M: Model> fmt::Debug for Manager<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager").field("model", &M::NAME).finish()
    }
}

impl<M: Model> Manager<M> {
    /// Creates a new `Manager` over `db`.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// Returns a `QuerySet` for all objects.
    #[must_use]
    pub fn all(&self) -> QuerySet<M> {
        QuerySet::new(self.db.clone())
    }

    /// Returns a `QuerySet` of the rows matching every criterion.
    #[must_use]
    pub fn filter(&self, criteria: Values) -> QuerySet<M> {
        self.all().filter(criteria)
    }

    /// Returns a `QuerySet` yielding the given columns as ordered maps.
    #[must_use]
    pub fn values(&self, columns: &[&str]) -> QuerySet<M> {
        self.all().values(columns)
    }

    /// Returns a `QuerySet` yielding the given columns as tuples, or as plain
    /// values of the first column when `flat` is set.
    #[must_use]
    pub fn values_list(&self, columns: &[&str], flat: bool) -> QuerySet<M> {
        self.all().values_list(columns, flat)
    }

    /// Fetches exactly one object matching every criterion.
    ///
    /// # Errors
    ///
    /// [`OrmError::EmptyCriteria`] without criteria, [`OrmError::NotFound`]
    /// and [`OrmError::MultipleObjectsReturned`] on the wrong row count, and
    /// backend failures.
    pub async fn get(&self, criteria: Values) -> Result<M> {
        if criteria.is_empty() {
            return Err(OrmError::EmptyCriteria { model: M::NAME });
        }
        let mut objects = self.filter(criteria).instances().await?;
        match objects.len() {
            1 => objects.pop().ok_or(OrmError::NotFound { model: M::NAME }),
            0 => Err(OrmError::NotFound { model: M::NAME }),
            count => Err(OrmError::MultipleObjectsReturned {
                model: M::NAME,
                count,
            }),
        }
    }

    /// Inserts a row from the given values and returns it as stored.
    ///
    /// Fields missing from `values` take their declared default; keys naming
    /// no field are rejected.
    ///
    /// # Errors
    ///
    /// [`FieldError::UnknownField`] for such keys; backend errors, constraint
    /// violations included, are returned as they are.
    pub async fn create(&self, values: Values) -> Result<M> {
        let values = known_fields::<M>(values)?;
        let statement = M::insert_from_values(&values);
        let id = self.db.insert_returning_id(&statement).await?;
        self.get(Values::new().with("id", id)).await
    }

    /// Inserts an unsaved instance and sets its id, or updates a saved one.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub async fn save(&self, instance: &mut M) -> Result<()> {
        if instance.is_saved() {
            return self.update(instance).await;
        }
        let statement = instance.insert_statement()?;
        let id = self.db.insert_returning_id(&statement).await?;
        instance.set_id(Some(id));
        Ok(())
    }

    /// Overwrites the stored row with every column of `instance`.
    ///
    /// # Errors
    ///
    /// [`OrmError::Unsaved`] without an id, and backend failures.
    pub async fn update(&self, instance: &M) -> Result<()> {
        if !instance.is_saved() {
            return Err(OrmError::Unsaved { model: M::NAME });
        }
        self.db.execute(&instance.update_statement()?).await?;
        Ok(())
    }

    /// Deletes the stored row. The instance keeps its id.
    ///
    /// # Errors
    ///
    /// [`OrmError::Unsaved`] without an id, and [`OrmError::DeletionFailed`]
    /// wrapping the backend error.
    pub async fn delete(&self, instance: &M) -> Result<()> {
        if !instance.is_saved() {
            return Err(OrmError::Unsaved { model: M::NAME });
        }
        self.db
            .execute(&instance.delete_statement())
            .await
            .map_err(OrmError::into_deletion_failure)?;
        Ok(())
    }

    /// Reloads every column of `instance` from its stored row.
    ///
    /// # Errors
    ///
    /// [`OrmError::Unsaved`] without an id, and the errors of [`Manager::get`].
    pub async fn refresh(&self, instance: &mut M) -> Result<()> {
        let id = instance.id().ok_or(OrmError::Unsaved { model: M::NAME })?;
        *instance = self.get(Values::new().with("id", id)).await?;
        Ok(())
    }

    /// Creates the table if it does not exist.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub async fn create_table(&self) -> Result<()> {
        info!(model = M::NAME, "creating table");
        self.db.execute_ddl(&M::create_table_sql()).await
    }

    /// Drops the table and anything depending on it.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub async fn drop_table(&self) -> Result<()> {
        info!(model = M::NAME, "dropping table");
        self.db.execute_ddl(&M::drop_table_sql()).await
    }
}

/// Rejects keys that name no field of `M`.
fn known_fields<M: Model>(values: Values) -> Result<Values> {
    let unknown = values
        .keys()
        .find(|key| M::meta().field(key).is_none())
        .map(str::to_string);
    unknown.map_or(Ok(values), |key| Err(FieldError::unknown(M::NAME, key).into()))
}
