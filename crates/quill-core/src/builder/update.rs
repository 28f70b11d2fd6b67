//! UPDATE statements.

use super::{placeholder, Statement};
use crate::builder::value::SqlValue;
use crate::meta::ModelMeta;

/// Renders an UPDATE of every declared column of the row `id`.
///
/// `values` must line up with `meta.columns()`; the id binds last. A model
/// without declared fields touches only its key.
#[must_use]
pub fn update(meta: &ModelMeta, values: Vec<SqlValue>, id: SqlValue) -> Statement {
    if meta.fields().is_empty() {
        return Statement::new(
            format!("UPDATE {} SET id=id WHERE id=$1;", meta.table()),
            vec![id],
        );
    }
    let assignments: Vec<String> = meta
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column}={}", placeholder(i + 1)))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE id={};",
        meta.table(),
        assignments.join(", "),
        placeholder(assignments.len() + 1)
    );
    let mut params = values;
    params.push(id);
    Statement::new(sql, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{CharField, IntegerField};
    use crate::meta::FieldMeta;

    #[test]
    fn test_update() {
        let meta = ModelMeta::new(
            "Job",
            "jobs_job",
            vec![
                FieldMeta::new("data", CharField::new(255)),
                FieldMeta::new("count", IntegerField::new().nullable()),
            ],
        );
        let statement = update(
            &meta,
            vec![SqlValue::Text("a".into()), SqlValue::Int(2)],
            SqlValue::Int(9),
        );
        assert_eq!(statement.sql, "UPDATE jobs_job SET data=$1, count=$2 WHERE id=$3;");
        assert_eq!(statement.params.last(), Some(&SqlValue::Int(9)));
    }
}
