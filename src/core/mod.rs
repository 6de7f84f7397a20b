/// Core Module for roster
///
/// Shared infrastructure underneath the student operations: database
/// sessions, the statement execution contract, schema bootstrap and the
/// error type every layer reports through.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{ConstraintKind, Result, RosterError};
