//! SQL values and parameter handling.
//!
//! Values are never interpolated into SQL text. Every value produced by a
//! model or supplied as criteria travels as a bound parameter.

use chrono::{DateTime, Utc};

use crate::error::ValueError;

/// The value type of a column, used to type NULL parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// `boolean`
    Bool,
    /// `integer` / `bigint`
    Int,
    /// `double precision`
    Float,
    /// `varchar(n)` / `text`
    Text,
    /// `timestamp with time zone`
    Timestamp,
}

impl SqlType {
    /// Returns a short human-readable name, used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
        }
    }
}

/// A SQL value that can be used as a parameter.
///
/// `Null` remembers the type of the column it belongs to so the backend
/// receives a correctly typed NULL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value of the given column type.
    Null(SqlType),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Timestamp with time zone, normalized to UTC.
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Returns true for any NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Returns the value type.
    #[must_use]
    pub const fn sql_type(&self) -> SqlType {
        match self {
            Self::Null(ty) => *ty,
            Self::Bool(_) => SqlType::Bool,
            Self::Int(_) => SqlType::Int,
            Self::Float(_) => SqlType::Float,
            Self::Text(_) => SqlType::Text,
            Self::Timestamp(_) => SqlType::Timestamp,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float; integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

/// Rust types with a fixed column value type.
///
/// Lets `Option<T>::None` become a typed NULL.
pub trait SqlTyped {
    /// The column value type of `Self`.
    const SQL_TYPE: SqlType;
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

/// Trait for types that can be read back from SQL values.
pub trait FromSqlValue: Sized {
    /// Converts a `SqlValue` into `Self`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when the value has another type, is NULL,
    /// or is out of range for `Self`.
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError>;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        Ok(value)
    }
}

macro_rules! impl_sql_typed {
    ($($ty:ty => $sql:ident),+ $(,)?) => {
        $(impl SqlTyped for $ty {
            const SQL_TYPE: SqlType = SqlType::$sql;
        })+
    };
}

impl_sql_typed!(
    bool => Bool,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    &str => Text,
    DateTime<Utc> => Timestamp,
);

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for DateTime<Utc> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self)
    }
}

impl<T: ToSqlValue + SqlTyped> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null(T::SQL_TYPE), ToSqlValue::to_sql_value)
    }
}

fn mismatch(expected: SqlType, found: &SqlValue) -> ValueError {
    if found.is_null() {
        ValueError::UnexpectedNull
    } else {
        ValueError::TypeMismatch {
            expected: expected.name(),
            found: found.sql_type().name(),
        }
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        value.as_bool().ok_or_else(|| mismatch(SqlType::Bool, &value))
    }
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        value.as_i64().ok_or_else(|| mismatch(SqlType::Int, &value))
    }
}

impl FromSqlValue for i32 {
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        let wide = i64::from_sql_value(value)?;
        Self::try_from(wide).map_err(|_| ValueError::OutOfRange(wide))
    }
}

impl FromSqlValue for i16 {
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        let wide = i64::from_sql_value(value)?;
        Self::try_from(wide).map_err(|_| ValueError::OutOfRange(wide))
    }
}

impl FromSqlValue for f64 {
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        value.as_f64().ok_or_else(|| mismatch(SqlType::Float, &value))
    }
}

impl FromSqlValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        f64::from_sql_value(value).map(|f| f as f32)
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        match value {
            SqlValue::Text(s) => Ok(s),
            other => Err(mismatch(SqlType::Text, &other)),
        }
    }
}

impl FromSqlValue for DateTime<Utc> {
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        value
            .as_timestamp()
            .ok_or_else(|| mismatch(SqlType::Timestamp, &value))
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self, ValueError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_sql_value(value).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(true.to_sql_value(), SqlValue::Bool(true));
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(2.5_f64.to_sql_value(), SqlValue::Float(2.5));
        assert_eq!(
            "hello".to_sql_value(),
            SqlValue::Text(String::from("hello"))
        );
        assert_eq!(Some(42_i32).to_sql_value(), SqlValue::Int(42));
    }

    #[test]
    fn test_none_becomes_typed_null() {
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null(SqlType::Int));
        assert_eq!(
            None::<DateTime<Utc>>.to_sql_value(),
            SqlValue::Null(SqlType::Timestamp)
        );
        assert_eq!(None::<String>.to_sql_value(), SqlValue::Null(SqlType::Text));
    }

    #[test]
    fn test_from_sql_value_conversions() {
        assert_eq!(i64::from_sql_value(SqlValue::Int(7)).unwrap(), 7);
        assert_eq!(i32::from_sql_value(SqlValue::Int(7)).unwrap(), 7);
        assert!((f64::from_sql_value(SqlValue::Float(5.5)).unwrap() - 5.5).abs() < f64::EPSILON);
        assert_eq!(
            String::from_sql_value(SqlValue::Text("x".into())).unwrap(),
            "x"
        );
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(
            DateTime::<Utc>::from_sql_value(SqlValue::Timestamp(ts)).unwrap(),
            ts
        );
    }

    #[test]
    fn test_int_widens_to_float() {
        assert!((f64::from_sql_value(SqlValue::Int(3)).unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_null_into_option_and_plain() {
        assert_eq!(
            Option::<String>::from_sql_value(SqlValue::Null(SqlType::Text)).unwrap(),
            None
        );
        assert!(matches!(
            String::from_sql_value(SqlValue::Null(SqlType::Text)),
            Err(ValueError::UnexpectedNull)
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let err = bool::from_sql_value(SqlValue::Int(1)).unwrap_err();
        assert!(matches!(
            err,
            ValueError::TypeMismatch {
                expected: "bool",
                found: "int"
            }
        ));
    }

    #[test]
    fn test_narrowing_out_of_range() {
        let err = i32::from_sql_value(SqlValue::Int(i64::MAX)).unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange(_)));
    }
}
