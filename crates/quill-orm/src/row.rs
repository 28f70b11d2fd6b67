//! Row decoding and parameter binding.

use chrono::{DateTime, NaiveDateTime, Utc};
use quill_core::{SqlType, SqlValue, Statement, ToSqlValue};
use sqlx::postgres::{PgArguments, PgColumn, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row, TypeInfo};

use crate::error::{OrmError, Result};

/// Builds a sqlx query with every parameter bound in order.
pub fn build_query(statement: &Statement) -> Query<'_, Postgres, PgArguments> {
    statement
        .params
        .iter()
        .cloned()
        .fold(sqlx::query(&statement.sql), bind_param)
}

/// Binds a `SqlValue` parameter, typing NULLs after their column.
fn bind_param(
    query: Query<'_, Postgres, PgArguments>,
    value: SqlValue,
) -> Query<'_, Postgres, PgArguments> {
    match value {
        SqlValue::Null(SqlType::Bool) => query.bind(Option::<bool>::None),
        SqlValue::Null(SqlType::Int) => query.bind(Option::<i64>::None),
        SqlValue::Null(SqlType::Float) => query.bind(Option::<f64>::None),
        SqlValue::Null(SqlType::Text) => query.bind(Option::<String>::None),
        SqlValue::Null(SqlType::Timestamp) => query.bind(Option::<DateTime<Utc>>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Timestamp(t) => query.bind(t),
    }
}

/// Decodes every column of a row, in select order.
pub fn decode_row(row: &PgRow) -> Result<Vec<SqlValue>> {
    row.columns()
        .iter()
        .map(|column| decode_column(row, column))
        .collect()
}

fn decode_column(row: &PgRow, column: &PgColumn) -> Result<SqlValue> {
    let index = column.ordinal();
    let value = match column.type_info().name() {
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.to_sql_value(),
        "INT2" => row.try_get::<Option<i16>, _>(index)?.to_sql_value(),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.to_sql_value(),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.to_sql_value(),
        "FLOAT4" => row.try_get::<Option<f32>, _>(index)?.to_sql_value(),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.to_sql_value(),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => {
            row.try_get::<Option<String>, _>(index)?.to_sql_value()
        }
        "TIMESTAMPTZ" => row.try_get::<Option<DateTime<Utc>>, _>(index)?.to_sql_value(),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|t| t.and_utc())
            .to_sql_value(),
        other => {
            return Err(OrmError::UnsupportedType(format!(
                "{other} (column `{}`)",
                column.name()
            )))
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    #[test]
    fn test_build_query_keeps_sql() {
        let statement = Statement::new(
            "SELECT id FROM jobs_job WHERE count=$1 AND date_created=$2;",
            vec![SqlValue::Int(1), SqlValue::Null(SqlType::Timestamp)],
        );
        let query = build_query(&statement);
        assert_eq!(
            query.sql(),
            "SELECT id FROM jobs_job WHERE count=$1 AND date_created=$2;"
        );
    }
}
