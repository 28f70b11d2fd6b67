//! Structured SELECT statements.

use super::{placeholder, Statement};
use crate::builder::value::SqlValue;
use crate::values::Values;

/// Order direction for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order (ASC)
    Asc,
    /// Descending order (DESC)
    Desc,
}

/// An ordering specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to order by
    pub column: String,
    /// Order direction
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Creates a new ascending order specification.
    #[must_use]
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: OrderDirection::Asc,
        }
    }

    /// Creates a new descending order specification.
    #[must_use]
    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: OrderDirection::Desc,
        }
    }

    /// Parses a field name, where a leading `-` means descending.
    ///
    /// `"-id"` is `id DESC`, `"content"` is `content ASC`.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        spec.strip_prefix('-').map_or_else(|| Self::asc(spec), Self::desc)
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self.direction {
            OrderDirection::Asc => format!("{} ASC", self.column),
            OrderDirection::Desc => format!("{} DESC", self.column),
        }
    }
}

/// A SELECT kept in parts and rendered on demand.
///
/// Criteria are equality tests joined with `AND`, in insertion order. The
/// WHERE clause always precedes ORDER BY regardless of the order in which
/// `filter` and `order_by` were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    table: &'static str,
    columns: Vec<String>,
    criteria: Vec<(String, SqlValue)>,
    ordering: Vec<OrderBy>,
}

impl Select {
    #[must_use]
    pub const fn new(table: &'static str, columns: Vec<String>) -> Self {
        Self {
            table,
            columns,
            criteria: Vec::new(),
            ordering: Vec::new(),
        }
    }

    /// Appends equality criteria.
    #[must_use]
    pub fn filter(mut self, criteria: &Values) -> Self {
        self.criteria.extend(
            criteria
                .iter()
                .map(|(column, value)| (column.to_string(), value.clone())),
        );
        self
    }

    /// Appends an ordering term (see [`OrderBy::parse`]).
    #[must_use]
    pub fn order_by(mut self, spec: &str) -> Self {
        self.ordering.push(OrderBy::parse(spec));
        self
    }

    /// Replaces the selected columns.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// The selected columns.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn criteria(&self) -> &[(String, SqlValue)] {
        &self.criteria
    }

    #[must_use]
    pub fn ordering(&self) -> &[OrderBy] {
        &self.ordering
    }

    /// The bound parameters, in placeholder order.
    #[must_use]
    pub fn params(&self) -> Vec<SqlValue> {
        self.criteria.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Renders the SQL text.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), self.table);
        if !self.criteria.is_empty() {
            let conditions: Vec<String> = self
                .criteria
                .iter()
                .enumerate()
                .map(|(i, (column, _))| format!("{column}={}", placeholder(i + 1)))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        if !self.ordering.is_empty() {
            let terms: Vec<String> = self.ordering.iter().map(OrderBy::to_sql).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
        sql.push(';');
        sql
    }

    /// Renders the SQL text and its parameters.
    #[must_use]
    pub fn build(&self) -> Statement {
        Statement::new(self.to_sql(), self.params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["id".into(), "content".into(), "count".into()]
    }

    #[test]
    fn test_order_by_parse() {
        assert_eq!(OrderBy::parse("-created_at").to_sql(), "created_at DESC");
        assert_eq!(OrderBy::parse("name").to_sql(), "name ASC");
    }

    #[test]
    fn test_select_all() {
        let select = Select::new("messages_message", columns());
        assert_eq!(
            select.to_sql(),
            "SELECT id, content, count FROM messages_message;"
        );
        assert!(select.params().is_empty());
    }

    #[test]
    fn test_where_precedes_order_by() {
        let select = Select::new("messages_message", columns())
            .order_by("-id")
            .filter(&Values::new().with("content", "a").with("count", 2));
        let statement = select.build();
        assert_eq!(
            statement.sql,
            "SELECT id, content, count FROM messages_message \
             WHERE content=$1 AND count=$2 ORDER BY id DESC;"
        );
        assert_eq!(
            statement.params,
            [SqlValue::Text("a".into()), SqlValue::Int(2)]
        );
    }

    #[test]
    fn test_filter_twice_conjoins() {
        let select = Select::new("jobs_job", vec!["id".into()])
            .filter(&Values::new().with("count", 1))
            .filter(&Values::new().with("is_active", true));
        assert_eq!(
            select.to_sql(),
            "SELECT id FROM jobs_job WHERE count=$1 AND is_active=$2;"
        );
        assert_eq!(select.params(), [SqlValue::Int(1), SqlValue::Bool(true)]);
    }

    #[test]
    fn test_with_columns_keeps_where_and_order() {
        let select = Select::new("jobs_job", columns())
            .filter(&Values::new().with("count", 1))
            .order_by("count")
            .order_by("-id")
            .with_columns(vec!["content".into()]);
        assert_eq!(
            select.to_sql(),
            "SELECT content FROM jobs_job WHERE count=$1 ORDER BY count ASC, id DESC;"
        );
    }
}
