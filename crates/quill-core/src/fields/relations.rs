//! Relational field type for foreign keys.

use super::{field_options_builder, Field, FieldOptions};
use crate::builder::value::SqlType;

/// A foreign key field that references another model's `id`.
///
/// A field declared as `job` is stored in a column named `job_id`.
///
/// # Example
///
/// ```ignore
/// #[derive(Model)]
/// struct Message {
///     id: Option<i64>,
///     #[field(foreign_key = Job, on_delete = "SET NULL")]
///     job: Option<i64>,
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ForeignKey {
    /// Table of the referenced model.
    pub target_table: String,
    /// What to do when the referenced row is deleted.
    pub on_delete: OnDelete,
    /// Field options.
    pub options: FieldOptions,
}

/// Behavior when a referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnDelete {
    /// Cascade the deletion to related rows.
    Cascade,
    /// Refuse the deletion.
    Protect,
    /// Set the foreign key to NULL.
    SetNull,
    /// Set the foreign key to its column default.
    SetDefault,
    /// Do nothing (the constraint is checked at statement end).
    #[default]
    DoNothing,
}

impl OnDelete {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn to_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Protect => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::DoNothing => "NO ACTION",
        }
    }

    /// Parses an action as written in SQL, case-insensitively.
    ///
    /// `DO NOTHING` is accepted as a spelling of `NO ACTION`. The derive's
    /// `on_delete = "..."` attribute accepts the same spellings.
    #[must_use]
    pub fn parse(action: &str) -> Option<Self> {
        let normalized = action.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "CASCADE" => Some(Self::Cascade),
            "RESTRICT" | "PROTECT" => Some(Self::Protect),
            "SET NULL" => Some(Self::SetNull),
            "SET DEFAULT" => Some(Self::SetDefault),
            "NO ACTION" | "DO NOTHING" => Some(Self::DoNothing),
            _ => None,
        }
    }
}

impl ForeignKey {
    /// Creates a new `ForeignKey` to the given table.
    #[must_use]
    pub fn new(target_table: &str) -> Self {
        Self {
            target_table: target_table.to_string(),
            on_delete: OnDelete::default(),
            options: FieldOptions::new(),
        }
    }

    /// Sets the `on_delete` behavior.
    #[must_use]
    pub const fn on_delete(mut self, behavior: OnDelete) -> Self {
        self.on_delete = behavior;
        self
    }
}

field_options_builder!(ForeignKey);

impl Field for ForeignKey {
    fn sql_type(&self) -> String {
        "BIGINT".to_string()
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn value_type(&self) -> SqlType {
        SqlType::Int
    }

    fn column_name(&self, name: &str) -> String {
        format!("{name}_id")
    }

    fn column_definition(&self, name: &str) -> String {
        format!(
            "{} {}{} REFERENCES {}(id) ON DELETE {}",
            self.column_name(name),
            self.sql_type(),
            self.options.not_null_suffix(),
            self.target_table,
            self.on_delete.to_sql()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_key_column() {
        let field = ForeignKey::new("jobs_job");
        assert_eq!(field.column_name("job"), "job_id");
        assert_eq!(
            field.column_definition("job"),
            "job_id BIGINT NOT NULL REFERENCES jobs_job(id) ON DELETE NO ACTION"
        );
    }

    #[test]
    fn test_foreign_key_nullable_set_null() {
        let field = ForeignKey::new("jobs_job")
            .nullable()
            .on_delete(OnDelete::SetNull);
        assert_eq!(
            field.column_definition("job"),
            "job_id BIGINT REFERENCES jobs_job(id) ON DELETE SET NULL"
        );
    }

    #[test]
    fn test_on_delete_parse() {
        assert_eq!(OnDelete::parse("set  null"), Some(OnDelete::SetNull));
        assert_eq!(OnDelete::parse("DO NOTHING"), Some(OnDelete::DoNothing));
        assert_eq!(OnDelete::parse("CASCADE"), Some(OnDelete::Cascade));
        assert_eq!(OnDelete::parse("explode"), None);
    }
}
