//! Table creation and removal.

use crate::meta::ModelMeta;

/// Renders `CREATE TABLE IF NOT EXISTS` for a model.
///
/// The serial primary key comes first, then each declared field in
/// declaration order.
#[must_use]
pub fn create_table(meta: &ModelMeta) -> String {
    let mut definitions = vec!["id SERIAL PRIMARY KEY".to_string()];
    definitions.extend(meta.fields().iter().map(|f| f.definition()));
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        meta.table(),
        definitions.join(", ")
    )
}

/// Renders `DROP TABLE IF EXISTS ... CASCADE` for a model.
#[must_use]
pub fn drop_table(meta: &ModelMeta) -> String {
    format!("DROP TABLE IF EXISTS {} CASCADE;", meta.table())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::value::SqlValue;
    use crate::fields::{BooleanField, CharField, ForeignKey, OnDelete};
    use crate::meta::FieldMeta;

    #[test]
    fn test_create_table() {
        let meta = ModelMeta::new(
            "Message",
            "messages_message",
            vec![
                FieldMeta::new("content", CharField::new(255)),
                FieldMeta::new(
                    "is_active",
                    BooleanField::new().with_default(SqlValue::Bool(true)),
                ),
                FieldMeta::new(
                    "job",
                    ForeignKey::new("jobs_job")
                        .nullable()
                        .on_delete(OnDelete::SetNull),
                ),
            ],
        );
        assert_eq!(
            create_table(&meta),
            "CREATE TABLE IF NOT EXISTS messages_message (id SERIAL PRIMARY KEY, \
             content varchar(255) NOT NULL, is_active boolean NOT NULL, \
             job_id BIGINT REFERENCES jobs_job(id) ON DELETE SET NULL);"
        );
    }

    #[test]
    fn test_create_table_without_fields() {
        let meta = ModelMeta::new("Empty", "emptys_empty", Vec::new());
        assert_eq!(
            create_table(&meta),
            "CREATE TABLE IF NOT EXISTS emptys_empty (id SERIAL PRIMARY KEY);"
        );
        assert_eq!(drop_table(&meta), "DROP TABLE IF EXISTS emptys_empty CASCADE;");
    }
}
