//! Ordered column/value maps.
//!
//! `Values` is what callers hand to `create`, `get` and `filter`, and what the
//! dict-shaped queryset yields. Iteration follows insertion order, so a WHERE
//! clause and its parameter list are always produced from the same walk.

use indexmap::IndexMap;

use crate::builder::value::{SqlValue, ToSqlValue};

/// An insertion-ordered map from column name to value.
///
/// # Example
///
/// ```
/// use quill_core::{SqlValue, Values};
///
/// let values = Values::new().with("content", "hello").with("count", 7);
/// assert_eq!(values.get("count"), Some(&SqlValue::Int(7)));
/// assert_eq!(values.keys().collect::<Vec<_>>(), ["content", "count"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    entries: IndexMap<String, SqlValue>,
}

impl Values {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value and returns the map.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.insert(column, value);
        self
    }

    /// Inserts a value, returning the previous one for that column.
    ///
    /// Re-inserting an existing column keeps its original position.
    pub fn insert(
        &mut self,
        column: impl Into<String>,
        value: impl ToSqlValue,
    ) -> Option<SqlValue> {
        self.entries.insert(column.into(), value.to_sql_value())
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries.get(column)
    }

    /// Removes a value, keeping the order of the remaining entries.
    pub fn take(&mut self, column: &str) -> Option<SqlValue> {
        self.entries.shift_remove(column)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.entries.contains_key(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column names in insertion order.
    #[must_use]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: ToSqlValue> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (column, value) in iter {
            values.insert(column, value);
        }
        values
    }
}

impl IntoIterator for Values {
    type Item = (String, SqlValue);
    type IntoIter = indexmap::map::IntoIter<String, SqlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let values = Values::new()
            .with("tries", 2)
            .with("content", "x")
            .with("count", 77);
        let keys: Vec<_> = values.keys().collect();
        assert_eq!(keys, ["tries", "content", "count"]);
    }

    #[test]
    fn test_take_keeps_order() {
        let mut values: Values = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(values.take("b"), Some(SqlValue::Int(2)));
        assert_eq!(values.keys().collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(values.take("b"), None);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut values = Values::new().with("a", 1).with("b", 2);
        assert_eq!(values.insert("a", 9), Some(SqlValue::Int(1)));
        assert_eq!(
            values.iter().collect::<Vec<_>>(),
            [("a", &SqlValue::Int(9)), ("b", &SqlValue::Int(2))]
        );
    }
}
