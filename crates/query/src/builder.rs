//! Fluent SQL statement builders.
//!
//! Builders are consumed by value, so one statement's clauses never leak
//! into the next. An update can only be rendered after a condition has
//! been attached: [`UpdateBuilder::filter`] returns a [`FilteredUpdate`],
//! which is the only type with a `build` method.

use crate::{PartialSchema, QueryError, Result, SqlValue, TableSchema};
use std::marker::PhantomData;

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// Builder for `SELECT` statements.
///
/// # Example
/// ```
/// use wards_query::{Order, SelectBuilder};
///
/// let sql = SelectBuilder::new()
///     .columns(["a", "b"])
///     .from("t")
///     .filter("id = 1")
///     .order_by("a", Order::Desc)
///     .limit(5)
///     .build();
///
/// assert_eq!(sql, "SELECT a, b FROM t WHERE id = 1 ORDER BY a DESC LIMIT 5");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    columns: Vec<String>,
    table: String,
    condition: Option<String>,
    order: Option<(String, Order)>,
    limit: Option<u32>,
}

impl SelectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projected columns or expressions. Defaults to `*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Table or join expression to select from.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Condition for the `WHERE` clause.
    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, order: Order) -> Self {
        self.order = Some((column.into(), order));
        self
    }

    pub fn limit(mut self, count: u32) -> Self {
        self.limit = Some(count);
        self
    }

    /// Render the statement, clauses separated by single spaces.
    pub fn build(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        let mut parts = vec![format!("SELECT {}", columns), format!("FROM {}", self.table)];
        if let Some(condition) = &self.condition {
            parts.push(format!("WHERE {}", condition));
        }
        if let Some((column, order)) = &self.order {
            parts.push(format!("ORDER BY {} {}", column, order.as_sql()));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("LIMIT {}", limit));
        }
        parts.join(" ")
    }
}

/// Builder for `UPDATE` statements, before a condition is attached.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: String,
    assignments: Vec<(&'static str, SqlValue)>,
}

impl UpdateBuilder {
    pub fn new(table: impl Into<String>, assignments: Vec<(&'static str, SqlValue)>) -> Self {
        Self {
            table: table.into(),
            assignments,
        }
    }

    /// Attach the `WHERE` condition.
    pub fn filter(self, condition: impl Into<String>) -> FilteredUpdate {
        FilteredUpdate {
            table: self.table,
            assignments: self.assignments,
            condition: condition.into(),
        }
    }
}

/// An `UPDATE` with its condition; ready to render.
#[derive(Debug, Clone)]
pub struct FilteredUpdate {
    table: String,
    assignments: Vec<(&'static str, SqlValue)>,
    condition: String,
}

impl FilteredUpdate {
    /// Render the statement. Fails with [`QueryError::EmptyUpdate`] when
    /// nothing is set.
    pub fn build(&self) -> Result<String> {
        if self.assignments.is_empty() {
            return Err(QueryError::EmptyUpdate);
        }

        let set = self
            .assignments
            .iter()
            .map(|(column, value)| format!("{} = {}", column, value))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "UPDATE {} SET {} WHERE {}",
            self.table, set, self.condition
        ))
    }
}

/// Builder for single-row `INSERT` statements.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    values: Vec<(&'static str, SqlValue)>,
}

impl InsertBuilder {
    pub fn new(table: impl Into<String>, values: Vec<(&'static str, SqlValue)>) -> Self {
        Self {
            table: table.into(),
            values,
        }
    }

    /// Render the statement with columns and values in mapping order.
    pub fn build(&self) -> String {
        let (columns, values): (Vec<&str>, Vec<String>) = self
            .values
            .iter()
            .map(|(column, value)| (*column, value.to_literal()))
            .unzip();

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            values.join(", ")
        )
    }
}

/// Entry point for statements against one table whose rows are `T`.
#[derive(Debug, Clone)]
pub struct QueryBuilder<T> {
    table: String,
    _schema: PhantomData<fn() -> T>,
}

impl<T: TableSchema> QueryBuilder<T> {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            _schema: PhantomData,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// A select against this table.
    pub fn select(&self) -> SelectBuilder {
        SelectBuilder::new().from(self.table.as_str())
    }

    /// An update setting the columns present in `patch`.
    pub fn update(&self, patch: &T::Patch) -> UpdateBuilder {
        UpdateBuilder::new(self.table.as_str(), patch.assignments())
    }

    /// An insert of a full record.
    pub fn insert(&self, record: &T) -> InsertBuilder {
        InsertBuilder::new(self.table.as_str(), record.columns())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewWard, WardPatch};

    #[test]
    fn test_select_defaults_to_star() {
        assert_eq!(SelectBuilder::new().from("t").build(), "SELECT * FROM t");
    }

    #[test]
    fn test_select_default_order_is_ascending() {
        let sql = SelectBuilder::new()
            .from("t")
            .order_by("distance", Order::default())
            .build();
        assert_eq!(sql, "SELECT * FROM t ORDER BY distance ASC");
    }

    #[test]
    fn test_select_full_chain() {
        let sql = SelectBuilder::new()
            .columns(["a", "b"])
            .from("t")
            .filter("id = 1")
            .order_by("a", Order::Desc)
            .limit(5)
            .build();
        assert_eq!(sql, "SELECT a, b FROM t WHERE id = 1 ORDER BY a DESC LIMIT 5");
    }

    #[test]
    fn test_update_renders_set_clause() {
        let sql = UpdateBuilder::new(
            "kenya_wards",
            vec![("ward", "O'Hara".into()), ("ward_code", SqlValue::Null)],
        )
        .filter("id = 3")
        .build()
        .unwrap();

        assert_eq!(
            sql,
            "UPDATE kenya_wards SET ward = 'O''Hara', ward_code = NULL WHERE id = 3"
        );
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let err = UpdateBuilder::new("t", Vec::new())
            .filter("id = 1")
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::EmptyUpdate));
    }

    #[test]
    fn test_insert_keeps_key_order() {
        let sql = InsertBuilder::new("t", vec![("b", 2.into()), ("a", "x".into())]).build();
        assert_eq!(sql, "INSERT INTO t (b, a) VALUES (2, 'x')");
    }

    #[test]
    fn test_typed_builder() {
        let wards = QueryBuilder::<NewWard>::new("kenya_wards");

        let patch = WardPatch {
            sub_county: Some(Some("Westlands".to_string())),
            ..Default::default()
        };
        let sql = wards.update(&patch).filter("id = 9").build().unwrap();
        assert_eq!(
            sql,
            "UPDATE kenya_wards SET sub_county = 'Westlands' WHERE id = 9"
        );

        assert_eq!(
            wards.select().limit(1).build(),
            "SELECT * FROM kenya_wards LIMIT 1"
        );
    }

    #[test]
    fn test_builders_do_not_share_state() {
        let wards = QueryBuilder::<NewWard>::new("kenya_wards");
        let first = wards.select().filter("id = 1").build();
        let second = wards.select().build();
        assert!(first.contains("WHERE"));
        assert!(!second.contains("WHERE"));
    }
}
