//! `QuerySet` implementation for lazy, chainable database queries.
//!
//! `QuerySet`s are lazy: nothing runs until the results are first requested
//! through `fetch`, `iter`, `get`, `first`, `len`, `is_empty` or `count`.
//! The rows are then cached, and later requests reuse them.

use std::fmt;

use quill_core::{Model, Select, SqlValue, Values};
use tokio::sync::OnceCell;

use crate::database::Database;
use crate::error::{OrmError, Result};

/// How a queryset turns rows into results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iterable {
    /// Model instances.
    Model,
    /// Ordered column/value maps.
    Values,
    /// Tuples of column values.
    ValuesList,
    /// The first column of each row.
    FlatValuesList,
}

impl Iterable {
    /// Shapes one decoded row; `fields` names its columns in order.
    fn materialize<M: Model>(self, fields: &[String], row: Vec<SqlValue>) -> Result<Record<M>> {
        let record = match self {
            Self::Model => Record::Instance(M::from_values(zip_row(fields, row))?),
            Self::Values => Record::Dict(zip_row(fields, row)),
            Self::ValuesList => Record::Tuple(row),
            Self::FlatValuesList => {
                let len = row.len();
                let value = row.into_iter().next().ok_or_else(|| {
                    OrmError::Database(sqlx::Error::ColumnIndexOutOfBounds { index: 0, len })
                })?;
                Record::Scalar(value)
            }
        };
        Ok(record)
    }
}

fn zip_row(fields: &[String], row: Vec<SqlValue>) -> Values {
    fields.iter().map(String::as_str).zip(row).collect()
}

/// One materialized result.
#[derive(Debug, Clone, PartialEq)]
pub enum Record<M> {
    Instance(M),
    Dict(Values),
    Tuple(Vec<SqlValue>),
    Scalar(SqlValue),
}

impl<M> Record<M> {
    #[must_use]
    pub const fn as_instance(&self) -> Option<&M> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_dict(&self) -> Option<&Values> {
        match self {
            Self::Dict(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tuple(&self) -> Option<&[SqlValue]> {
        match self {
            Self::Tuple(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_scalar(&self) -> Option<&SqlValue> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_instance(self) -> Option<M> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }
}

/// A lazy, chainable query.
///
/// Chaining methods take `&self` and return a new `QuerySet` with an empty
/// cache; the receiver is left untouched, evaluated or not.
///
/// # Example
///
/// ```ignore
/// let recent = Message::objects()?
///     .filter(Values::new().with("content", "test content"))
///     .order_by(&["-id"]);
///
/// let counts = recent.values_list(&["count"], true);
/// assert_eq!(counts.count().await?, 2);
/// ```
pub struct QuerySet<M: Model> {
    db: Database,
    select: Select,
    fields: Vec<String>,
    iterable: Iterable,
    cache: OnceCell<Vec<Record<M>>>,
}

// Manual Clone implementation to avoid M: Clone bound
impl<M: Model> Clone for QuerySet<M> {
    fn clone(&self) -> Self {
        self.derive(self.select.clone(), self.fields.clone(), self.iterable)
    }
}

impl<M: Model> fmt::Debug for QuerySet<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySet")
            .field("model", &M::NAME)
            .field("select", &self.select)
            .field("iterable", &self.iterable)
            .field("evaluated", &self.is_evaluated())
            .finish()
    }
}

impl<M: Model> QuerySet<M> {
    /// Creates a `QuerySet` over every row of `M`.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            db,
            select: M::select_all(),
            fields: M::meta().select_columns(),
            iterable: Iterable::Model,
            cache: OnceCell::new(),
        }
    }

    /// Builds an unevaluated `QuerySet` sharing this one's database.
    fn derive(&self, select: Select, fields: Vec<String>, iterable: Iterable) -> Self {
        Self {
            db: self.db.clone(),
            select,
            fields,
            iterable,
            cache: OnceCell::new(),
        }
    }

    /// Adds equality criteria, joined with AND to any existing ones.
    ///
    /// A foreign key field name matches its `{name}_id` column.
    #[must_use]
    pub fn filter(&self, criteria: Values) -> Self {
        self.derive(
            self.select
                .clone()
                .filter(&M::meta().resolve_criteria(criteria)),
            self.fields.clone(),
            self.iterable,
        )
    }

    /// Orders the results; a `-` prefix sorts descending.
    ///
    /// ```ignore
    /// qs.order_by(&["-date_created", "content"])
    /// ```
    #[must_use]
    pub fn order_by(&self, fields: &[&str]) -> Self {
        let select = fields
            .iter()
            .fold(self.select.clone(), |select, field| select.order_by(field));
        self.derive(select, self.fields.clone(), self.iterable)
    }

    /// Yields the given columns as ordered maps.
    ///
    /// No columns means every column. Names are not checked; an unknown
    /// column fails when the query runs.
    #[must_use]
    pub fn values(&self, columns: &[&str]) -> Self {
        self.with_columns(columns, Iterable::Values)
    }

    /// Yields the given columns as tuples, or the first column alone when
    /// `flat` is set.
    #[must_use]
    pub fn values_list(&self, columns: &[&str], flat: bool) -> Self {
        let iterable = if flat {
            Iterable::FlatValuesList
        } else {
            Iterable::ValuesList
        };
        self.with_columns(columns, iterable)
    }

    fn with_columns(&self, columns: &[&str], iterable: Iterable) -> Self {
        let columns = if columns.is_empty() {
            M::meta().select_columns()
        } else {
            M::meta().resolve_columns(columns)
        };
        self.derive(
            self.select.clone().with_columns(columns.clone()),
            columns,
            iterable,
        )
    }

    /// Renders the SQL text.
    #[must_use]
    pub fn sql(&self) -> String {
        self.select.to_sql()
    }

    /// The bound parameters, in placeholder order.
    #[must_use]
    pub fn params(&self) -> Vec<SqlValue> {
        self.select.params()
    }

    /// Names of the selected columns.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub const fn iterable(&self) -> Iterable {
        self.iterable
    }

    /// Returns whether the results have been fetched.
    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.cache.initialized()
    }

    async fn load(&self) -> Result<Vec<Record<M>>> {
        let rows = self.db.fetch_rows(&self.select.build()).await?;
        rows.into_iter()
            .map(|row| self.iterable.materialize(&self.fields, row))
            .collect()
    }

    /// Runs the query on first call and returns the cached results.
    ///
    /// # Errors
    ///
    /// Backend, decoding and row conversion failures of the query.
    pub async fn fetch(&self) -> Result<&[Record<M>]> {
        let records = self.cache.get_or_try_init(|| self.load()).await?;
        Ok(records.as_slice())
    }

    /// Iterates over the results.
    ///
    /// # Errors
    ///
    /// Backend, decoding and row conversion failures of the query.
    pub async fn iter(&self) -> Result<std::slice::Iter<'_, Record<M>>> {
        Ok(self.fetch().await?.iter())
    }

    /// Returns the result at `index`.
    ///
    /// # Errors
    ///
    /// Backend, decoding and row conversion failures of the query.
    pub async fn get(&self, index: usize) -> Result<Option<&Record<M>>> {
        Ok(self.fetch().await?.get(index))
    }

    /// # Errors
    ///
    /// As [`QuerySet::fetch`].
    pub async fn first(&self) -> Result<Option<&Record<M>>> {
        self.get(0).await
    }

    /// Number of results.
    ///
    /// # Errors
    ///
    /// Backend, decoding and row conversion failures of the query.
    pub async fn len(&self) -> Result<usize> {
        Ok(self.fetch().await?.len())
    }

    /// # Errors
    ///
    /// As [`QuerySet::fetch`].
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.fetch().await?.is_empty())
    }

    /// Number of results, counted from the fetched rows.
    ///
    /// # Errors
    ///
    /// Backend, decoding and row conversion failures of the query.
    pub async fn count(&self) -> Result<usize> {
        self.len().await
    }

    /// Consumes the `QuerySet` and returns its results, fetching if needed.
    ///
    /// # Errors
    ///
    /// Backend, decoding and row conversion failures of the query.
    pub async fn into_records(mut self) -> Result<Vec<Record<M>>> {
        if let Some(records) = self.cache.take() {
            return Ok(records);
        }
        self.load().await
    }

    /// Consumes the `QuerySet` and returns its model instances.
    ///
    /// Querysets shaped by `values` or `values_list` yield no instances.
    ///
    /// # Errors
    ///
    /// Backend, decoding and row conversion failures of the query.
    pub async fn instances(self) -> Result<Vec<M>> {
        Ok(self
            .into_records()
            .await?
            .into_iter()
            .filter_map(Record::into_instance)
            .collect())
    }

    /// Consumes the `QuerySet` and returns the plain values of a flat list.
    ///
    /// # Errors
    ///
    /// Backend, decoding and row conversion failures of the query.
    pub async fn scalars(self) -> Result<Vec<SqlValue>> {
        Ok(self
            .into_records()
            .await?
            .into_iter()
            .filter_map(|record| match record {
                Record::Scalar(value) => Some(value),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DatabaseSettings;
    use quill_core::{SqlType, SqlValue};

    #[allow(dead_code)]
    #[derive(Debug, Clone, PartialEq, Model)]
    struct Message {
        id: Option<i64>,
        content: String,
        count: Option<i32>,
        #[field(default = 0.0)]
        tries: f64,
    }

    #[allow(dead_code)]
    #[derive(Debug, Clone, PartialEq, Model)]
    struct Reply {
        id: Option<i64>,
        #[field(foreign_key = Message, on_delete = "CASCADE")]
        message: i64,
    }

    fn queryset() -> QuerySet<Message> {
        let db = Database::connect_lazy(&DatabaseSettings::new("quill", "postgres"));
        QuerySet::new(db)
    }

    #[tokio::test]
    async fn test_new_selects_every_column() {
        let qs = queryset();
        assert_eq!(
            qs.sql(),
            "SELECT id, content, count, tries FROM messages_message;"
        );
        assert_eq!(qs.fields(), ["id", "content", "count", "tries"]);
        assert_eq!(qs.iterable(), Iterable::Model);
        assert!(!qs.is_evaluated());
    }

    #[tokio::test]
    async fn test_chaining_leaves_original_untouched() {
        let base = queryset();
        let filtered = base.filter(Values::new().with("content", "x"));
        let ordered = filtered.order_by(&["-id"]);

        assert_eq!(
            base.sql(),
            "SELECT id, content, count, tries FROM messages_message;"
        );
        assert_eq!(
            filtered.sql(),
            "SELECT id, content, count, tries FROM messages_message WHERE content=$1;"
        );
        assert_eq!(
            ordered.sql(),
            "SELECT id, content, count, tries FROM messages_message \
             WHERE content=$1 ORDER BY id DESC;"
        );
        assert_eq!(ordered.params(), [SqlValue::Text("x".into())]);
        assert!(base.params().is_empty());
    }

    #[tokio::test]
    async fn test_filter_after_order_by_renders_where_first() {
        let qs = queryset()
            .order_by(&["content", "-id"])
            .filter(Values::new().with("count", 3));
        assert_eq!(
            qs.sql(),
            "SELECT id, content, count, tries FROM messages_message \
             WHERE count=$1 ORDER BY content ASC, id DESC;"
        );
    }

    #[tokio::test]
    async fn test_filter_by_foreign_key_name_uses_its_column() {
        let db = Database::connect_lazy(&DatabaseSettings::new("quill", "postgres"));
        let qs = QuerySet::<Reply>::new(db).filter(Values::new().with("message", 4));
        assert_eq!(
            qs.sql(),
            "SELECT id, message_id FROM replys_reply WHERE message_id=$1;"
        );
        assert_eq!(qs.params(), [SqlValue::Int(4)]);
    }

    #[tokio::test]
    async fn test_values_list_keeps_where_clause() {
        let qs = queryset()
            .filter(Values::new().with("content", "x"))
            .values_list(&["count"], true);
        assert_eq!(
            qs.sql(),
            "SELECT count FROM messages_message WHERE content=$1;"
        );
        assert_eq!(qs.iterable(), Iterable::FlatValuesList);
        assert_eq!(qs.fields(), ["count"]);

        let tuples = queryset().values_list(&["id", "count"], false);
        assert_eq!(tuples.iterable(), Iterable::ValuesList);
    }

    #[tokio::test]
    async fn test_values_without_columns_selects_all() {
        let qs = queryset().values(&[]);
        assert_eq!(qs.iterable(), Iterable::Values);
        assert_eq!(qs.fields(), ["id", "content", "count", "tries"]);
    }

    #[tokio::test]
    async fn test_clone_is_unevaluated() {
        let qs = queryset().filter(Values::new().with("count", 1));
        let copy = qs.clone();
        assert_eq!(copy.sql(), qs.sql());
        assert_eq!(copy.params(), qs.params());
        assert!(!copy.is_evaluated());
    }

    #[test]
    fn test_materialize_model_row() {
        let fields: Vec<String> = ["id", "content", "count", "tries"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let row = vec![
            SqlValue::Int(1),
            SqlValue::Text("hi".into()),
            SqlValue::Null(SqlType::Int),
            SqlValue::Float(1.5),
        ];
        let record = Iterable::Model
            .materialize::<Message>(&fields, row.clone())
            .unwrap();
        assert_eq!(
            record.into_instance(),
            Some(Message {
                id: Some(1),
                content: "hi".into(),
                count: None,
                tries: 1.5,
            })
        );

        let record = Iterable::Values
            .materialize::<Message>(&fields, row.clone())
            .unwrap();
        let dict = record.as_dict().unwrap();
        assert_eq!(dict.get("content"), Some(&SqlValue::Text("hi".into())));
        assert_eq!(dict.keys().collect::<Vec<_>>(), ["id", "content", "count", "tries"]);

        let record = Iterable::FlatValuesList
            .materialize::<Message>(&fields, row)
            .unwrap();
        assert_eq!(record.as_scalar(), Some(&SqlValue::Int(1)));
    }

    #[test]
    fn test_flat_row_without_columns_is_an_error() {
        let err = Iterable::FlatValuesList
            .materialize::<Message>(&[], Vec::new())
            .unwrap_err();
        assert!(matches!(
            err,
            OrmError::Database(sqlx::Error::ColumnIndexOutOfBounds { index: 0, len: 0 })
        ));
    }
}
