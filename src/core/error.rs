/// Roster Error Module
///
/// This module defines the error types for the roster data access layer.
/// Every failure a DAL operation can produce is one of these variants, so
/// callers branch on the failure kind instead of parsing messages.
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::db::schema::BootstrapStep;

/// Which kind of constraint the storage engine rejected a write with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    PrimaryKey,
    NotNull,
    Check,
    ForeignKey,
    Other,
}

impl ConstraintKind {
    /// Maps an SQLite extended result code onto a constraint kind.
    pub fn from_extended_code(code: i32) -> Self {
        use rusqlite::ffi;

        match code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintKind::Unique,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::PrimaryKey,
            ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintKind::NotNull,
            ffi::SQLITE_CONSTRAINT_CHECK => ConstraintKind::Check,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
            _ => ConstraintKind::Other,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::PrimaryKey => "primary key",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Check => "check",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Error type for the roster application.
///
/// The variants follow the failure taxonomy of the data access layer:
/// - connection failures (nothing else is attempted for that call)
/// - validation failures (raised before any database round-trip)
/// - constraint violations, with duplicate emails singled out
/// - missing records targeted by update/delete
/// - every other statement-level failure
#[derive(Error, Debug)]
pub enum RosterError {
    /// The database could not be opened or configured
    #[error("Connection error ({target}): {source}")]
    Connection {
        target: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Caller-supplied arguments failed a precondition
    #[error("Validation error: {0}")]
    Validation(String),

    /// The unique constraint on `email` rejected a write
    #[error("Email '{0}' already exists in the database")]
    DuplicateEmail(String),

    /// Any other constraint the storage engine rejected a write with
    #[error("Constraint violation ({kind}): {message}")]
    Constraint { kind: ConstraintKind, message: String },

    /// No student carries the requested id
    #[error("Student with ID {0} not found")]
    NotFound(i64),

    /// A write that should have touched a row touched none
    #[error("Statement affected no rows")]
    NoRowsAffected,

    /// Statement-level failures (malformed SQL, type mismatch, I/O inside SQLite)
    #[error("Database error: {0}")]
    Execution(#[from] rusqlite::Error),

    /// A fetched row did not have the expected shape
    #[error("Row decode error: {0}")]
    Decode(String),

    /// Schema bootstrap failed at a specific step
    #[error("Database setup failed while {step}: {source}")]
    Bootstrap {
        step: BootstrapStep,
        #[source]
        source: Box<RosterError>,
    },

    /// An external SQL resource could not be read
    #[error("SQL file not found or unreadable ({}): {source}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Console I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON export errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Presentation errors (unknown export formats)
    #[error("UI error: {0}")]
    Ui(String),
}

impl RosterError {
    /// Classifies a raw statement error.
    ///
    /// Constraint failures keep their kind so named operations can turn a
    /// unique violation into [`RosterError::DuplicateEmail`].
    pub fn from_statement(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RosterError::Constraint {
                    kind: ConstraintKind::from_extended_code(code.extended_code),
                    message: message.unwrap_or_else(|| code.to_string()),
                }
            }
            other => RosterError::Execution(other),
        }
    }

    /// Returns true for a unique-constraint rejection.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            RosterError::Constraint {
                kind: ConstraintKind::Unique,
                ..
            }
        )
    }
}

/// Type alias for Result to use RosterError as the error type.
pub type Result<T> = std::result::Result<T, RosterError>;
