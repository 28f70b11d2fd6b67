//! DELETE statements.

use super::Statement;
use crate::builder::value::SqlValue;
use crate::meta::ModelMeta;

/// Renders a DELETE of the row `id`.
#[must_use]
pub fn delete(meta: &ModelMeta, id: SqlValue) -> Statement {
    Statement::new(
        format!("DELETE FROM {} WHERE id = $1;", meta.table()),
        vec![id],
    )
}
