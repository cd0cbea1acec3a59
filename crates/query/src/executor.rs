//! The seam between statement text and a database.

use crate::Result;

/// One result row: column name to JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Runs statement text against a database.
///
/// Implementations report failures as [`crate::QueryError`] values;
/// the service layer turns them into messages.
pub trait QueryExecutor {
    /// Run a statement and return its rows.
    fn query(&self, sql: &str) -> Result<Vec<Row>>;

    /// Run a statement and return the number of rows it changed.
    fn execute(&self, sql: &str) -> Result<usize>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn query(&self, sql: &str) -> Result<Vec<Row>> {
        (**self).query(sql)
    }

    fn execute(&self, sql: &str) -> Result<usize> {
        (**self).execute(sql)
    }
}
