/// # Test Utilities Module
///
/// Isolated database fixtures for unit tests. Every fixture lives in its own
/// temporary directory, so tests never share state and can run in parallel.

use crate::config::{DbConfig, ResourceConfig};
use crate::core::db::connection::acquire;
use crate::core::db::schema::read_sql;
use crate::dal::StudentDal;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path of a bundled SQL resource under `database/`.
pub fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("database").join(name)
}

/// Bundled schema and seed locations, independent of the working directory.
pub fn bundled_resources() -> ResourceConfig {
    ResourceConfig {
        schema: resource("schema.sql"),
        seed: resource("initial_data.sql"),
    }
}

/// A throwaway database file and a DAL pointed at it.
pub struct DatabaseFixture {
    dal: StudentDal,
    // Held so the directory outlives the fixture's DAL.
    _dir: TempDir,
}

impl DatabaseFixture {
    /// A database file that does not exist yet.
    pub fn bare() -> Self {
        let dir = TempDir::new().unwrap();
        let config = DbConfig {
            database: dir.path().join("students.db").to_string_lossy().into_owned(),
            ..DbConfig::default()
        };
        DatabaseFixture {
            dal: StudentDal::with_resources(config, bundled_resources()),
            _dir: dir,
        }
    }

    /// Schema applied, no rows.
    pub fn empty() -> Self {
        let fixture = Self::bare();
        let session = acquire(fixture.dal.config()).unwrap();
        let schema = read_sql(&fixture.dal.resources().schema).unwrap();
        session.mutate(&schema, &[]).unwrap();
        fixture
    }

    /// Schema applied and the three seed students loaded.
    pub fn seeded() -> Self {
        let fixture = Self::bare();
        fixture.dal.bootstrap_schema().unwrap();
        fixture
    }

    pub fn dal(&self) -> &StudentDal {
        &self.dal
    }
}
