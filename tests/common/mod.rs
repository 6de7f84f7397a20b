//! Shared fixtures for integration tests.

#![allow(dead_code)]

use roster::{DbConfig, ResourceConfig, StudentDal};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("database").join(name)
}

/// A DAL over a fresh database file inside its own temporary directory.
pub struct TestDb {
    pub dal: StudentDal,
    pub dir: TempDir,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let config = DbConfig {
            database: db_path(&dir).to_string_lossy().into_owned(),
            ..DbConfig::default()
        };
        let resources = ResourceConfig {
            schema: resource("schema.sql"),
            seed: resource("initial_data.sql"),
        };
        TestDb {
            dal: StudentDal::with_resources(config, resources),
            dir,
        }
    }

    /// Schema and seed rows applied.
    pub fn seeded() -> Self {
        let db = Self::new();
        db.dal.bootstrap_schema().expect("bootstrap");
        db
    }

    /// Schema applied, every row removed.
    pub fn empty() -> Self {
        let db = Self::seeded();
        for student in db.dal.list_all().expect("list") {
            db.dal.delete(student.student_id).expect("delete");
        }
        db
    }

    pub fn db_path(&self) -> PathBuf {
        db_path(&self.dir)
    }
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("students.db")
}
