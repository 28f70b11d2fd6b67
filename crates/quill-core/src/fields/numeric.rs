//! Numeric field types.

use super::{field_options_builder, Field, FieldOptions};
use crate::builder::value::SqlType;

/// A 32-bit integer field.
#[derive(Debug, Clone, Default)]
pub struct IntegerField {
    /// Field options.
    pub options: FieldOptions,
}

impl IntegerField {
    /// Creates a new `IntegerField`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: FieldOptions::new(),
        }
    }
}

field_options_builder!(IntegerField);

impl Field for IntegerField {
    fn sql_type(&self) -> String {
        "integer".to_string()
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn value_type(&self) -> SqlType {
        SqlType::Int
    }
}

/// A double precision floating point field.
#[derive(Debug, Clone, Default)]
pub struct FloatField {
    /// Field options.
    pub options: FieldOptions,
}

impl FloatField {
    /// Creates a new `FloatField`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: FieldOptions::new(),
        }
    }
}

field_options_builder!(FloatField);

impl Field for FloatField {
    fn sql_type(&self) -> String {
        "double precision".to_string()
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn value_type(&self) -> SqlType {
        SqlType::Float
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_field_sql() {
        assert_eq!(
            IntegerField::new().column_definition("count"),
            "count integer NOT NULL"
        );
        assert_eq!(
            IntegerField::new().nullable().column_definition("count"),
            "count integer"
        );
    }

    #[test]
    fn test_float_field_sql() {
        assert_eq!(
            FloatField::new().column_definition("tries"),
            "tries double precision NOT NULL"
        );
        assert_eq!(FloatField::new().value_type(), SqlType::Float);
    }
}
