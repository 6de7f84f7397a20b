/// Connection Management Module
///
/// This module opens database sessions and guarantees they are released.
/// A [`Session`] is a scoped guard: it owns exactly one connection for the
/// lifetime of one operation and closes it when dropped, so every exit path
/// (including `?` early returns) releases the handle.

use crate::config::DbConfig;
use crate::core::db::query::{ExecMode, ExecOutcome, QueryExecutor, QueryResult};
use crate::core::{Result, RosterError};
use rusqlite::{Connection, OpenFlags, ToSql};
use std::time::Duration;
use tracing::{debug, warn};

/// An open, exclusively owned database connection.
#[derive(Debug)]
pub struct Session {
    /// Active connection (None once released)
    connection: Option<Connection>,
    /// Label used in logs and error messages
    target: String,
}

/// Opens a session against the configured database.
///
/// # Errors
///
/// Returns `RosterError::Connection` when the database cannot be opened or
/// the connection pragmas cannot be applied. Nothing panics past this point.
pub fn acquire(config: &DbConfig) -> Result<Session> {
    let target = config.target();
    debug!(database = %target, endpoint = %config.endpoint(), "opening connection");

    // SQLite opens a private temporary database for an empty path.
    if config.database.trim().is_empty() {
        warn!("connection failed: no database named");
        return Err(RosterError::Connection {
            target,
            source: rusqlite::Error::InvalidPath(config.database.clone().into()),
        });
    }

    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    if config.create_if_missing {
        flags |= OpenFlags::SQLITE_OPEN_CREATE;
    }

    let connection = Connection::open_with_flags(&config.database, flags)
        .and_then(|conn| {
            conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(conn)
        })
        .map_err(|source| {
            warn!(database = %target, error = %source, "connection failed");
            RosterError::Connection {
                target: target.clone(),
                source,
            }
        })?;

    Ok(Session {
        connection: Some(connection),
        target,
    })
}

impl Session {
    /// Checks if the session still holds a live connection
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&self) -> Result<&Connection> {
        self.connection
            .as_ref()
            .ok_or_else(|| RosterError::Execution(rusqlite::Error::InvalidQuery))
    }

    /// Runs one statement in the given mode. See [`QueryExecutor::execute`].
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql], mode: ExecMode) -> Result<ExecOutcome> {
        QueryExecutor::new(self.connection()?).execute(sql, params, mode)
    }

    /// Runs a read-only statement and returns every row.
    pub fn fetch(&self, sql: &str, params: &[&dyn ToSql]) -> Result<QueryResult> {
        QueryExecutor::new(self.connection()?).fetch(sql, params)
    }

    /// Runs a write in its own transaction and returns the affected-row count.
    pub fn mutate(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        QueryExecutor::new(self.connection()?).mutate(sql, params)
    }

    /// Releases the connection and reports any close failure.
    ///
    /// Dropping the session has the same effect; this method only exists for
    /// callers that want to see the close error. Calling it on an already
    /// released session is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match self.connection.take() {
            Some(conn) => {
                debug!(database = %self.target, "closing connection");
                conn.close().map_err(|(_, err)| RosterError::Execution(err))
            }
            None => Ok(()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(database = %self.target, error = %err, "connection close failed");
        }
    }
}
