//! The `Model` trait.
//!
//! `#[derive(Model)]` implements the required items; the statement builders
//! are provided methods shared by every model.

use crate::builder::{self, Select, SqlValue, Statement, ToSqlValue};
use crate::error::FieldError;
use crate::meta::ModelMeta;
use crate::values::Values;

/// A struct mapped to one PostgreSQL table.
///
/// # Example
///
/// ```
/// use quill_core::Model;
///
/// #[derive(Debug, Model)]
/// struct Job {
///     id: Option<i64>,
///     data: String,
///     #[field(default = true)]
///     is_active: bool,
/// }
///
/// assert_eq!(Job::TABLE, "jobs_job");
/// assert_eq!(
///     Job::create_table_sql(),
///     "CREATE TABLE IF NOT EXISTS jobs_job (id SERIAL PRIMARY KEY, \
///      data varchar(255) NOT NULL, is_active boolean NOT NULL);"
/// );
/// ```
pub trait Model: Sized + Send + Sync + 'static {
    /// The struct name.
    const NAME: &'static str;

    /// The table name, `{lower}s_{lower}` of the struct name.
    const TABLE: &'static str;

    /// Returns the model metadata, built on first call.
    fn meta() -> &'static ModelMeta;

    /// The primary key, `None` until the instance is first saved.
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);

    /// Reads a column (`id` included) by column or field name.
    ///
    /// # Errors
    ///
    /// [`FieldError::UnknownField`] when the model has no such column.
    fn value(&self, column: &str) -> Result<SqlValue, FieldError>;

    /// Writes a column (`id` included) by column or field name.
    ///
    /// # Errors
    ///
    /// [`FieldError::UnknownField`] for an unknown column, and
    /// [`FieldError::InvalidValue`] when `value` does not fit the field.
    fn set_value(&mut self, column: &str, value: SqlValue) -> Result<(), FieldError>;

    /// Builds an instance from supplied values.
    ///
    /// Each field takes its value by column name, then by field name, then
    /// from the declared default.
    ///
    /// # Errors
    ///
    /// [`FieldError::UnknownField`] for keys naming no field, and
    /// [`FieldError::InvalidValue`] when a value does not fit its field.
    fn from_values(values: Values) -> Result<Self, FieldError>;

    /// Returns whether this instance has a primary key.
    #[must_use]
    fn is_saved(&self) -> bool {
        self.id().is_some()
    }

    /// Returns the values of every declared column, in declaration order.
    ///
    /// # Errors
    ///
    /// Propagates [`Model::value`] failures.
    fn column_values(&self) -> Result<Vec<SqlValue>, FieldError> {
        Self::meta()
            .fields()
            .iter()
            .map(|f| self.value(f.column()))
            .collect()
    }

    #[must_use]
    fn create_table_sql() -> String {
        builder::create_table(Self::meta())
    }

    #[must_use]
    fn drop_table_sql() -> String {
        builder::drop_table(Self::meta())
    }

    /// INSERT from supplied values, defaults filling the gaps.
    #[must_use]
    fn insert_from_values(values: &Values) -> Statement {
        builder::insert_from_values(Self::meta(), values)
    }

    /// INSERT of this instance's current values.
    ///
    /// # Errors
    ///
    /// Propagates [`Model::column_values`] failures.
    fn insert_statement(&self) -> Result<Statement, FieldError> {
        Ok(builder::insert(Self::meta(), self.column_values()?))
    }

    /// UPDATE of every declared column, keyed by `id`.
    ///
    /// An unsaved instance binds a NULL id and matches no row.
    ///
    /// # Errors
    ///
    /// Propagates [`Model::column_values`] failures.
    fn update_statement(&self) -> Result<Statement, FieldError> {
        Ok(builder::update(
            Self::meta(),
            self.column_values()?,
            self.id().to_sql_value(),
        ))
    }

    /// DELETE keyed by `id`.
    #[must_use]
    fn delete_statement(&self) -> Statement {
        builder::delete(Self::meta(), self.id().to_sql_value())
    }

    /// SELECT of `id` and every declared column.
    #[must_use]
    fn select_all() -> Select {
        Select::new(Self::TABLE, Self::meta().select_columns())
    }

    /// SELECT of the row(s) matching `criteria`; see [`Model::select_filter`].
    #[must_use]
    fn select_single_row(criteria: &Values) -> Select {
        Self::select_filter(criteria)
    }

    /// SELECT of the rows matching every criterion.
    ///
    /// A foreign key field name matches its `{name}_id` column.
    #[must_use]
    fn select_filter(criteria: &Values) -> Select {
        Self::select_all().filter(&Self::meta().resolve_criteria(criteria.clone()))
    }

    /// SELECT of the named columns only.
    ///
    /// A foreign key field name selects its `{name}_id` column.
    #[must_use]
    fn select_values(columns: &[&str]) -> Select {
        Select::new(Self::TABLE, Self::meta().resolve_columns(columns))
    }
}
