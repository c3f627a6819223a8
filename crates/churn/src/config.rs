//! Configuration management for churn.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Command-line flags and their environment variables (CHURN_*)
//! 2. Config file (--config / CHURN_CONFIG, or ./churn.toml)
//! 3. Default values

use anyhow::{Context, Result};
use churn_core::BatchOptions;
use churn_core::init::DEFAULT_TABLE;
use churn_core::runner::{DEFAULT_EXTENSION, DEFAULT_PREVIEW_ROWS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "churn.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Seeded table settings
    #[serde(default)]
    pub table: TableConfig,

    /// Batch runner settings
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// DuckDB database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// CSV dataset loaded by `churn init`
    #[serde(default = "default_csv")]
    pub csv: PathBuf,

    /// Directory of SQL scripts run by `churn run`
    #[serde(default = "default_sql_dir")]
    pub sql_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Name of the table created from the CSV
    #[serde(default = "default_table")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Extension of script files
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Maximum rows shown per query result
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_database() -> PathBuf {
    PathBuf::from("churn.duckdb")
}

fn default_csv() -> PathBuf {
    PathBuf::from("data/customer_churn_business_dataset.csv")
}

fn default_sql_dir() -> PathBuf {
    PathBuf::from("sql")
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_preview_rows() -> usize {
    DEFAULT_PREVIEW_ROWS
}

fn default_log_level() -> String {
    "churn=info".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            csv: default_csv(),
            sql_dir: default_sql_dir(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: default_table(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, or ./churn.toml if present.
    ///
    /// An explicit file must exist; the implicit one falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Replace configured paths with command-line (or env) values.
    pub fn apply_overrides(&mut self, database: Option<PathBuf>, sql_dir: Option<PathBuf>) {
        if let Some(database) = database {
            self.paths.database = database;
        }
        if let Some(sql_dir) = sql_dir {
            self.paths.sql_dir = sql_dir;
        }
    }

    /// Batch runner options derived from the config.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            extension: self.runner.extension.clone(),
            preview_rows: self.runner.preview_rows,
        }
    }
}
