//! Boolean field type.

use super::{field_options_builder, Field, FieldOptions};
use crate::builder::value::SqlType;

/// A boolean field.
#[derive(Debug, Clone, Default)]
pub struct BooleanField {
    /// Field options.
    pub options: FieldOptions,
}

impl BooleanField {
    /// Creates a new `BooleanField`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: FieldOptions::new(),
        }
    }
}

field_options_builder!(BooleanField);

impl Field for BooleanField {
    fn sql_type(&self) -> String {
        "boolean".to_string()
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn value_type(&self) -> SqlType {
        SqlType::Bool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::value::SqlValue;

    #[test]
    fn test_boolean_field_sql() {
        let field = BooleanField::new();
        assert_eq!(field.column_definition("is_active"), "is_active boolean NOT NULL");
    }

    #[test]
    fn test_boolean_default() {
        let field = BooleanField::new().with_default(SqlValue::Bool(true));
        assert_eq!(field.default_value(), SqlValue::Bool(true));
    }
}
