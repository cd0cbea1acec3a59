//! Literal values embedded in statement text.
//!
//! Every value that reaches SQL goes through [`SqlValue`], so escaping is
//! decided by the value's type rather than at each call site.

use std::fmt;

/// A closed set of literal kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// `NULL`, unquoted
    Null,
    /// Integer, unquoted
    Integer(i64),
    /// Real, unquoted; non-finite values render as `NULL`
    Real(f64),
    /// Text, single-quoted with embedded quotes doubled
    Text(String),
}

impl SqlValue {
    /// Render the value as a SQL literal.
    ///
    /// # Example
    /// ```
    /// use wards_query::SqlValue;
    ///
    /// assert_eq!(SqlValue::from("O'Brien").to_literal(), "'O''Brien'");
    /// assert_eq!(SqlValue::from(42).to_literal(), "42");
    /// assert_eq!(SqlValue::Null.to_literal(), "NULL");
    /// ```
    pub fn to_literal(&self) -> String {
        self.to_string()
    }

    /// Whether this is `NULL` (including a non-finite real).
    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Real(value) => !value.is_finite(),
            _ => false,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Integer(value) => write!(f, "{}", value),
            SqlValue::Real(value) if value.is_finite() => write!(f, "{}", value),
            SqlValue::Real(_) => f.write_str("NULL"),
            SqlValue::Text(text) => write!(f, "'{}'", text.replace('\'', "''")),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(i64::from(value))
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Integer(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Escape a LIKE pattern fragment so `%`, `_` and `\` match literally.
///
/// Pair with `ESCAPE '\'` in the statement.
pub fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
