//! INSERT statements.

use super::{placeholder, Statement};
use crate::builder::value::SqlValue;
use crate::meta::ModelMeta;
use crate::values::Values;

/// Renders an INSERT of `values`, which must line up with `meta.columns()`.
///
/// The statement returns the generated `id`. A model without declared fields
/// inserts `DEFAULT VALUES`.
#[must_use]
pub fn insert(meta: &ModelMeta, values: Vec<SqlValue>) -> Statement {
    if meta.fields().is_empty() {
        return Statement::raw(format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING id;",
            meta.table()
        ));
    }
    let placeholders: Vec<String> = (1..=values.len()).map(placeholder).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING id;",
        meta.table(),
        meta.columns().join(", "),
        placeholders.join(", ")
    );
    Statement::new(sql, values)
}

/// Renders an INSERT from caller-supplied values.
///
/// Each field is looked up by column, then by field name; missing fields take
/// their declared default, or NULL.
#[must_use]
pub fn insert_from_values(meta: &ModelMeta, supplied: &Values) -> Statement {
    let values = meta.fields().iter().map(|f| f.lookup(supplied)).collect();
    insert(meta, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::value::SqlType;
    use crate::fields::{CharField, FloatField, ForeignKey};
    use crate::meta::FieldMeta;

    fn meta() -> ModelMeta {
        ModelMeta::new(
            "Message",
            "messages_message",
            vec![
                FieldMeta::new("content", CharField::new(255)),
                FieldMeta::new("tries", FloatField::new().with_default(SqlValue::Float(0.0))),
                FieldMeta::new("job", ForeignKey::new("jobs_job").nullable()),
            ],
        )
    }

    #[test]
    fn test_insert_from_values_fills_defaults() {
        let supplied = Values::new().with("content", "x").with("job", 5);
        let statement = insert_from_values(&meta(), &supplied);
        assert_eq!(
            statement.sql,
            "INSERT INTO messages_message (content, tries, job_id) \
             VALUES ($1, $2, $3) RETURNING id;"
        );
        assert_eq!(
            statement.params,
            [
                SqlValue::Text("x".into()),
                SqlValue::Float(0.0),
                SqlValue::Int(5)
            ]
        );
    }

    #[test]
    fn test_insert_missing_nullable_is_typed_null() {
        let statement = insert_from_values(&meta(), &Values::new().with("content", "x"));
        assert_eq!(statement.params[2], SqlValue::Null(SqlType::Int));
    }
}
