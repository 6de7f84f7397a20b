/// Query Execution Module
///
/// Every statement the roster runs goes through [`QueryExecutor::execute`].
/// Parameters are always bound as placeholders, reads never commit, and each
/// write is its own transaction: committed on success, rolled back on error.

use crate::core::{Result, RosterError};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Batch, Connection, ToSql};
use tracing::{debug, warn};

/// A fetched row: one value per selected column, in column order.
pub type Row = Vec<Value>;

/// Selects how a statement is run and what it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Read-only; returns every result row and never commits
    Fetch,
    /// Write; returns the affected-row count and commits immediately
    Mutate,
}

/// Represents the result of a fetch-mode statement
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Column names from the query result
    pub columns: Vec<String>,
    /// Rows of data in result order
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Creates a new QueryResult from column names and row data
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        QueryResult { columns, rows }
    }

    /// Number of rows returned
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What a successful [`QueryExecutor::execute`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    Rows(QueryResult),
    Affected(usize),
}

/// Query execution service that operates on a database connection
pub struct QueryExecutor<'a> {
    connection: &'a Connection,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new QueryExecutor for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        QueryExecutor { connection }
    }

    /// Runs `sql` with `params` bound to its placeholders.
    ///
    /// In [`ExecMode::Fetch`] the full result set is returned and nothing is
    /// committed. In [`ExecMode::Mutate`] the statement runs inside its own
    /// transaction, which is committed before the affected-row count is
    /// returned.
    ///
    /// # Errors
    ///
    /// Any statement failure rolls back the connection's open transaction and
    /// is returned as a classified [`RosterError`] (see
    /// [`RosterError::from_statement`]). An error is never confused with
    /// zero affected rows.
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql], mode: ExecMode) -> Result<ExecOutcome> {
        match mode {
            ExecMode::Fetch => self.fetch(sql, params).map(ExecOutcome::Rows),
            ExecMode::Mutate => self.mutate(sql, params).map(ExecOutcome::Affected),
        }
    }

    /// Fetch-mode execution. See [`QueryExecutor::execute`].
    pub fn fetch(&self, sql: &str, params: &[&dyn ToSql]) -> Result<QueryResult> {
        match self.collect_rows(sql, params) {
            Ok(result) => {
                debug!(mode = "fetch", rows = result.row_count(), "statement executed");
                Ok(result)
            }
            Err(err) => {
                self.rollback_pending();
                warn!(mode = "fetch", error = %err, "statement failed");
                Err(RosterError::from_statement(err))
            }
        }
    }

    /// Mutate-mode execution. See [`QueryExecutor::execute`].
    ///
    /// `sql` may hold several statements (schema and seed scripts do). They
    /// run in order inside the same transaction; parameters are bound only
    /// to statements that declare placeholders, and the affected counts are
    /// summed.
    pub fn mutate(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        let tx = self
            .connection
            .unchecked_transaction()
            .map_err(RosterError::from_statement)?;

        match self.apply_statements(sql, params) {
            Ok(affected) => {
                tx.commit().map_err(RosterError::from_statement)?;
                debug!(mode = "mutate", affected, "statement committed");
                Ok(affected)
            }
            Err(err) => {
                warn!(mode = "mutate", error = %err, "statement failed, rolling back");
                if let Err(rollback_err) = tx.rollback() {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(RosterError::from_statement(err))
            }
        }
    }

    fn collect_rows(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<QueryResult> {
        let mut stmt = self.connection.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query(params)?;
        while let Some(row) = cursor.next()? {
            let values = (0..column_count)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Row>>()?;
            rows.push(values);
        }

        Ok(QueryResult::new(columns, rows))
    }

    fn apply_statements(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<usize> {
        let mut batch = Batch::new(self.connection, sql);
        let mut affected = 0;
        while let Some(mut stmt) = batch.next()? {
            affected += if stmt.parameter_count() > 0 {
                stmt.execute(params)?
            } else {
                stmt.execute([])?
            };
        }
        Ok(affected)
    }

    /// Undoes anything left open on the connection after a failed read.
    fn rollback_pending(&self) {
        if !self.connection.is_autocommit() {
            if let Err(err) = self.connection.execute_batch("ROLLBACK") {
                warn!(error = %err, "rollback failed");
            }
        }
    }
}

/// Formats a column value for messages and console output
pub fn format_value(value: &Value) -> String {
    match ValueRef::from(value) {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).to_string(),
        ValueRef::Blob(b) => format!("<BLOB: {} bytes>", b.len()),
    }
}
