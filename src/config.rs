//! Configuration management and validation.
//!
//! One [`EtlConfig`] is built at startup, from defaults, an optional TOML
//! file and command-line overrides, and is then passed explicitly to every
//! component that needs it.

use crate::constants::{
    DEFAULT_BUCKET, DEFAULT_DATABASE_HOST, DEFAULT_DATABASE_NAME, DEFAULT_DATABASE_PATH,
    DEFAULT_DATABASE_PORT, DEFAULT_DOWNLOAD_DIR, DEFAULT_LOG_PATH, DEFAULT_OUTPUT_PATH,
    DEFAULT_REGION, DEFAULT_SOURCE_DIR, DEFAULT_STORAGE_ROOT, DEFAULT_TABLE_NAME,
};
use crate::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a source file that fails to parse is handled. Applies to every format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Log the failure, skip the file and keep going
    #[default]
    Skip,
    /// Abort the whole run
    Abort,
}

/// Object storage location and credentials
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    /// Directory backing the local object store
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: DEFAULT_REGION.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            root: PathBuf::from(DEFAULT_STORAGE_ROOT),
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("root", &self.root)
            .finish()
    }
}

/// Relational sink location and credentials
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
    /// Table replaced on every run
    pub table: String,
    /// SQLite database file
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DATABASE_HOST.to_string(),
            port: DEFAULT_DATABASE_PORT,
            username: String::new(),
            password: String::new(),
            name: DEFAULT_DATABASE_NAME.to_string(),
            table: DEFAULT_TABLE_NAME.to_string(),
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

impl DatabaseConfig {
    /// Connection description safe for logs
    pub fn display_url(&self) -> String {
        format!(
            "{}:{}@{}:{}/{}",
            self.username,
            redact(&self.password),
            self.host,
            self.port,
            self.name
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("name", &self.name)
            .field("table", &self.table)
            .field("path", &self.path)
            .finish()
    }
}

/// Local filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub source_dir: PathBuf,
    pub download_dir: PathBuf,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

/// Global configuration for one pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub paths: PathsConfig,
    pub on_parse_error: ParseErrorPolicy,
}

impl EtlConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| EtlError::Configuration {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let config = Self::from_toml_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EtlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<()> {
        if self.storage.bucket.trim().is_empty() {
            return Err(EtlError::Configuration {
                message: "storage.bucket must not be empty".to_string(),
            });
        }
        if self.database.table.trim().is_empty() {
            return Err(EtlError::Configuration {
                message: "database.table must not be empty".to_string(),
            });
        }
        if self.paths.output_path.file_name().is_none() {
            return Err(EtlError::Configuration {
                message: format!(
                    "paths.output_path '{}' does not name a file",
                    self.paths.output_path.display()
                ),
            });
        }
        Ok(())
    }

    /// Set the directory raw files are staged from
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.paths.source_dir = dir.into();
        self
    }

    /// Set the directory raw objects are downloaded into
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.paths.download_dir = dir.into();
        self
    }

    /// Set the transformed output path
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.output_path = path.into();
        self
    }

    /// Set the run log path
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.log_path = path.into();
        self
    }

    /// Set the directory backing the object store
    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage.root = root.into();
        self
    }

    /// Set the SQLite database file
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database.path = path.into();
        self
    }

    /// Choose how parse failures are handled
    pub fn with_parse_error_policy(mut self, policy: ParseErrorPolicy) -> Self {
        self.on_parse_error = policy;
        self
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "***" }
}
