/// Schema Bootstrap Module
///
/// Provisions the students table and its seed rows from two external SQL
/// files. Each file is read in full and applied as one mutate-mode script.
/// Re-running against a populated database is allowed to fail on the seed's
/// unique emails.

use crate::config::DbConfig;
use crate::core::db::connection::acquire;
use crate::core::{Result, RosterError};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// The step a bootstrap run was on when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    Connect,
    ReadSchema,
    ApplySchema,
    ReadSeed,
    ApplySeed,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            BootstrapStep::Connect => "connecting",
            BootstrapStep::ReadSchema => "reading the schema file",
            BootstrapStep::ApplySchema => "creating the schema",
            BootstrapStep::ReadSeed => "reading the initial data file",
            BootstrapStep::ApplySeed => "inserting initial data",
        };
        f.write_str(step)
    }
}

/// Reads an SQL resource in full.
pub fn read_sql(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| RosterError::Resource {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies the schema file, then the seed file, on one session.
///
/// # Errors
///
/// Returns `RosterError::Bootstrap` naming the failed [`BootstrapStep`].
/// The schema is left in place if only the seed step fails.
pub fn bootstrap_schema(config: &DbConfig, schema: &Path, seed: &Path) -> Result<()> {
    let at = |step: BootstrapStep| {
        move |err: RosterError| {
            warn!(%step, error = %err, "bootstrap failed");
            RosterError::Bootstrap {
                step,
                source: Box::new(err),
            }
        }
    };

    let session = acquire(config).map_err(at(BootstrapStep::Connect))?;

    let schema_sql = read_sql(schema).map_err(at(BootstrapStep::ReadSchema))?;
    session
        .mutate(&schema_sql, &[])
        .map_err(at(BootstrapStep::ApplySchema))?;
    info!(path = %schema.display(), "schema created");

    let seed_sql = read_sql(seed).map_err(at(BootstrapStep::ReadSeed))?;
    let inserted = session
        .mutate(&seed_sql, &[])
        .map_err(at(BootstrapStep::ApplySeed))?;
    info!(path = %seed.display(), rows = inserted, "initial data inserted");

    Ok(())
}
