/// Database Module
///
/// The database layer is split into three concerns:
/// - **Connection Management** (`connection.rs`): scoped sessions, released on every exit path
/// - **Query Execution** (`query.rs`): fetch/mutate execution with commit-or-rollback
/// - **Schema Bootstrap** (`schema.rs`): applies the external schema and seed scripts
///
/// All database operations report failures through `RosterError`.
pub mod connection;
pub mod query;
pub mod schema;

pub use connection::{acquire, Session};
pub use query::{ExecMode, ExecOutcome, QueryExecutor, QueryResult, Row};
pub use schema::{bootstrap_schema, BootstrapStep};
