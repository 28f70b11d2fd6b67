//! Field types for model definitions.
//!
//! A field descriptor carries one column's type and constraints and renders
//! its own column SQL. Descriptors are built once, when a model's metadata is
//! first requested, and are shared by every instance of that model.

mod boolean;
mod char;
mod numeric;
mod relations;
mod temporal;

pub use boolean::BooleanField;
pub use char::{CharField, TextField};
pub use numeric::{FloatField, IntegerField};
pub use relations::{ForeignKey, OnDelete};
pub use temporal::DateTimeField;

use std::fmt;

use crate::builder::value::{SqlType, SqlValue};

/// Common field options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Value used when an insert or constructor does not supply one.
    ///
    /// Not checked against the column type.
    pub default: Option<SqlValue>,
}

impl FieldOptions {
    /// Creates new field options with defaults (`NOT NULL`, no default).
    pub const fn new() -> Self {
        Self {
            nullable: false,
            default: None,
        }
    }

    /// Sets the nullable option.
    #[must_use]
    pub const fn nullable(mut self, value: bool) -> Self {
        self.nullable = value;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: SqlValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Returns the `" NOT NULL"` suffix, or nothing for nullable columns.
    pub(crate) const fn not_null_suffix(&self) -> &'static str {
        if self.nullable {
            ""
        } else {
            " NOT NULL"
        }
    }
}

/// Trait for field types that can generate SQL column definitions.
pub trait Field: fmt::Debug + Send + Sync {
    /// Returns the SQL type for this field, e.g. `varchar(255)`.
    fn sql_type(&self) -> String;

    /// Returns the field options.
    fn options(&self) -> &FieldOptions;

    /// Returns the value type stored in this column.
    fn value_type(&self) -> SqlType;

    /// Returns the column name for a field declared as `name`.
    fn column_name(&self, name: &str) -> String {
        name.to_string()
    }

    /// Renders the column clause used inside `CREATE TABLE`.
    fn column_definition(&self, name: &str) -> String {
        format!(
            "{} {}{}",
            self.column_name(name),
            self.sql_type(),
            self.options().not_null_suffix()
        )
    }

    /// Returns the declared default, or a NULL of this column's type.
    fn default_value(&self) -> SqlValue {
        self.options()
            .default
            .clone()
            .unwrap_or(SqlValue::Null(self.value_type()))
    }
}

/// Implements the builder methods shared by every field type.
macro_rules! field_options_builder {
    ($ty:ty) => {
        impl $ty {
            /// Marks the column as nullable.
            #[must_use]
            pub fn nullable(mut self) -> Self {
                self.options = self.options.nullable(true);
                self
            }

            /// Sets the default value used when none is supplied.
            #[must_use]
            pub fn with_default(mut self, value: $crate::builder::value::SqlValue) -> Self {
                self.options = self.options.with_default(value);
                self
            }

            /// Replaces the field options.
            #[must_use]
            pub fn with_options(mut self, options: $crate::fields::FieldOptions) -> Self {
                self.options = options;
                self
            }
        }
    };
}

pub(crate) use field_options_builder;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_falls_back_to_typed_null() {
        let field = IntegerField::new();
        assert_eq!(field.default_value(), SqlValue::Null(SqlType::Int));

        let field = IntegerField::new().with_default(SqlValue::Int(3));
        assert_eq!(field.default_value(), SqlValue::Int(3));
    }

    #[test]
    fn test_column_definition_nullability() {
        assert_eq!(
            TextField::new().column_definition("body"),
            "body text NOT NULL"
        );
        assert_eq!(
            TextField::new().nullable().column_definition("body"),
            "body text"
        );
    }
}
