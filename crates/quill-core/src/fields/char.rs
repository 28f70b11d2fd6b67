//! Character/string field types.

use super::{field_options_builder, Field, FieldOptions};
use crate::builder::value::SqlType;

/// A character field with a maximum length.
///
/// # Example
///
/// ```ignore
/// #[derive(Model)]
/// struct User {
///     id: Option<i64>,
///     #[field(char, max_length = 150)]
///     username: String,
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CharField {
    /// Maximum length of the field.
    pub max_length: usize,
    /// Field options.
    pub options: FieldOptions,
}

impl CharField {
    /// Creates a new `CharField` with the given max length.
    #[must_use]
    pub const fn new(max_length: usize) -> Self {
        Self {
            max_length,
            options: FieldOptions::new(),
        }
    }
}

impl Default for CharField {
    fn default() -> Self {
        Self::new(255)
    }
}

field_options_builder!(CharField);

impl Field for CharField {
    fn sql_type(&self) -> String {
        format!("varchar({})", self.max_length)
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn value_type(&self) -> SqlType {
        SqlType::Text
    }
}

/// A text field for large strings (no max length).
#[derive(Debug, Clone, Default)]
pub struct TextField {
    /// Field options.
    pub options: FieldOptions,
}

impl TextField {
    /// Creates a new `TextField`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: FieldOptions::new(),
        }
    }
}

field_options_builder!(TextField);

impl Field for TextField {
    fn sql_type(&self) -> String {
        "text".to_string()
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn value_type(&self) -> SqlType {
        SqlType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_field_sql() {
        assert_eq!(CharField::new(120).sql_type(), "varchar(120)");
        assert_eq!(
            CharField::default().column_definition("content"),
            "content varchar(255) NOT NULL"
        );
        assert_eq!(
            CharField::new(120).nullable().column_definition("body"),
            "body varchar(120)"
        );
    }

    #[test]
    fn test_text_field_sql() {
        assert_eq!(TextField::new().sql_type(), "text");
    }
}
