//! Model metadata.
//!
//! A `ModelMeta` is built once per model type, the first time it is
//! requested, and cached for the life of the process. Its field list is in
//! declaration order; that order fixes the column order of every generated
//! statement.

use std::fmt;

use crate::builder::value::SqlValue;
use crate::fields::Field;
use crate::values::Values;

/// One declared field and its column.
pub struct FieldMeta {
    name: &'static str,
    column: String,
    field: Box<dyn Field>,
}

impl FieldMeta {
    /// Registers `field` under the declared name `name`.
    #[must_use]
    pub fn new(name: &'static str, field: impl Field + 'static) -> Self {
        Self {
            name,
            column: field.column_name(name),
            field: Box::new(field),
        }
    }

    /// The declared field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The column name (`{name}_id` for foreign keys).
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The field descriptor.
    #[must_use]
    pub fn field(&self) -> &dyn Field {
        self.field.as_ref()
    }

    /// Renders this column's `CREATE TABLE` clause.
    #[must_use]
    pub fn definition(&self) -> String {
        self.field.column_definition(self.name)
    }

    /// Returns the declared default (typed NULL when none was declared).
    #[must_use]
    pub fn default_value(&self) -> SqlValue {
        self.field.default_value()
    }

    /// Looks up this field's value in `values`, by column then by field name,
    /// falling back to the default. Both keys are removed.
    pub fn take_from(&self, values: &mut Values) -> SqlValue {
        let by_column = values.take(&self.column);
        let by_name = if self.column == self.name {
            None
        } else {
            values.take(self.name)
        };
        by_column
            .or(by_name)
            .unwrap_or_else(|| self.default_value())
    }

    /// Like [`take_from`](Self::take_from) without consuming.
    #[must_use]
    pub fn lookup(&self, values: &Values) -> SqlValue {
        values
            .get(&self.column)
            .or_else(|| values.get(self.name))
            .cloned()
            .unwrap_or_else(|| self.default_value())
    }
}

impl fmt::Debug for FieldMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMeta")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("field", &self.field)
            .finish()
    }
}

/// Table-level metadata of a model.
#[derive(Debug)]
pub struct ModelMeta {
    name: &'static str,
    table: &'static str,
    fields: Vec<FieldMeta>,
}

impl ModelMeta {
    #[must_use]
    pub const fn new(name: &'static str, table: &'static str, fields: Vec<FieldMeta>) -> Self {
        Self {
            name,
            table,
            fields,
        }
    }

    /// The model (struct) name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The table name.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// Declared fields, in declaration order. The primary key is not listed.
    #[must_use]
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    /// Finds a field by declared name or column name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields
            .iter()
            .find(|f| f.name == name || f.column == name)
    }

    /// Column names of the declared fields, without `id`.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.column.clone()).collect()
    }

    /// Maps field names to column names; other names pass through.
    #[must_use]
    pub fn resolve_columns(&self, names: &[&str]) -> Vec<String> {
        names
            .iter()
            .map(|name| {
                self.field(name)
                    .map_or_else(|| (*name).to_string(), |f| f.column.clone())
            })
            .collect()
    }

    /// Renames criteria keyed by field name to their column; other keys
    /// pass through.
    #[must_use]
    pub fn resolve_criteria(&self, criteria: Values) -> Values {
        criteria
            .into_iter()
            .map(|(key, value)| {
                let column = self.field(&key).map_or(key, |f| f.column.clone());
                (column, value)
            })
            .collect()
    }

    /// Column names with `id` first, as selected for full instances.
    #[must_use]
    pub fn select_columns(&self) -> Vec<String> {
        let mut columns = self.columns();
        if !columns.iter().any(|c| c == "id") {
            columns.insert(0, "id".to_string());
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::value::SqlType;
    use crate::fields::{CharField, ForeignKey, IntegerField};

    fn meta() -> ModelMeta {
        ModelMeta::new(
            "Message",
            "messages_message",
            vec![
                FieldMeta::new("content", CharField::new(255)),
                FieldMeta::new("count", IntegerField::new().nullable()),
                FieldMeta::new("job", ForeignKey::new("jobs_job").nullable()),
            ],
        )
    }

    #[test]
    fn test_columns_keep_declaration_order() {
        let meta = meta();
        assert_eq!(meta.columns(), ["content", "count", "job_id"]);
        assert_eq!(meta.select_columns(), ["id", "content", "count", "job_id"]);
    }

    #[test]
    fn test_field_lookup_by_name_or_column() {
        let meta = meta();
        assert_eq!(meta.field("job").map(FieldMeta::column), Some("job_id"));
        assert_eq!(meta.field("job_id").map(FieldMeta::name), Some("job"));
        assert!(meta.field("missing").is_none());
        assert_eq!(
            meta.resolve_columns(&["id", "job", "content"]),
            ["id", "job_id", "content"]
        );
    }

    #[test]
    fn test_take_from_prefers_column_then_name_then_default() {
        let meta = meta();
        let job = meta.field("job").unwrap();

        let mut values = Values::new().with("job", 3).with("job_id", 4);
        assert_eq!(job.take_from(&mut values), SqlValue::Int(4));
        assert!(values.is_empty());

        let mut values = Values::new().with("job", 3);
        assert_eq!(job.take_from(&mut values), SqlValue::Int(3));

        let mut values = Values::new();
        assert_eq!(job.take_from(&mut values), SqlValue::Null(SqlType::Int));
    }

    #[test]
    fn test_resolve_criteria_maps_foreign_keys() {
        let criteria = Values::new().with("job", 2).with("id", 5).with("count", 1);
        let resolved = meta().resolve_criteria(criteria);
        assert_eq!(
            resolved.iter().collect::<Vec<_>>(),
            [
                ("job_id", &SqlValue::Int(2)),
                ("id", &SqlValue::Int(5)),
                ("count", &SqlValue::Int(1)),
            ]
        );
    }
}
