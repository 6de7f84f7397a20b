use crate::core::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DbConfig,
    pub resources: ResourceConfig,
}

/// Connection settings shared by every DAL operation.
///
/// The embedded engine addresses its store by `database`, a file path (or an
/// SQLite URI). `host`, `port` and `user` describe the endpoint in logs so a
/// config written for a networked deployment still parses unchanged.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
    pub port: u16,
    /// Create the database file on first connect
    pub create_if_missing: bool,
    /// How long a statement waits on a locked database
    pub busy_timeout_ms: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            host: "localhost".to_string(),
            database: "students.db".to_string(),
            user: "roster".to_string(),
            password: None,
            port: 5432,
            create_if_missing: true,
            busy_timeout_ms: 5_000,
        }
    }
}

impl DbConfig {
    /// The database this configuration connects to.
    pub fn target(&self) -> String {
        self.database.clone()
    }

    /// `user@host:port`, for logs.
    pub fn endpoint(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }

    /// Rejects a blank database name or host.
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(RosterError::Config("database must not be empty".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(RosterError::Config("host must not be empty".to_string()));
        }
        Ok(())
    }
}

// Hand-written so the password never reaches logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .field("create_if_missing", &self.create_if_missing)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .finish()
    }
}

/// Locations of the schema and seed SQL files.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ResourceConfig {
    pub schema: PathBuf,
    pub seed: PathBuf,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig {
            schema: PathBuf::from("database/schema.sql"),
            seed: PathBuf::from("database/initial_data.sql"),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// Missing keys fall back to their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| RosterError::Config(format!("{}: {}", path.display(), e)))?;
    let config = parse_config(&content)
        .map_err(|e| RosterError::Config(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Parses and validates a TOML configuration document.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(content).map_err(|e| RosterError::Config(e.to_string()))?;
    config.database.validate()?;
    Ok(config)
}

/// Per-user configuration file, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("roster").join("config.toml"))
}

/// Resolves the configuration for a run.
///
/// An explicit path must exist. Without one, the per-user file is used when
/// present, and built-in defaults otherwise.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => load_config(path),
        _ => Ok(Config::default()),
    }
}
