//! Temporal (date/time) field types.

use super::{field_options_builder, Field, FieldOptions};
use crate::builder::value::SqlType;

/// A timezone-aware timestamp field, read and written as `DateTime<Utc>`.
#[derive(Debug, Clone, Default)]
pub struct DateTimeField {
    /// Field options.
    pub options: FieldOptions,
}

impl DateTimeField {
    /// Creates a new `DateTimeField`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: FieldOptions::new(),
        }
    }
}

field_options_builder!(DateTimeField);

impl Field for DateTimeField {
    fn sql_type(&self) -> String {
        "timestamp with time zone".to_string()
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn value_type(&self) -> SqlType {
        SqlType::Timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_field_sql() {
        assert_eq!(
            DateTimeField::new().column_definition("date_created"),
            "date_created timestamp with time zone NOT NULL"
        );
        assert_eq!(
            DateTimeField::new().nullable().column_definition("date_created"),
            "date_created timestamp with time zone"
        );
    }
}
