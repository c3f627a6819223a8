//! Error types for churn-core.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using churn-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for churn operations
#[derive(Error, Debug)]
pub enum Error {
    // Filesystem errors
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // CSV ingestion errors
    #[error("Failed to load {} into a table: {source}", csv.display())]
    Schema {
        csv: PathBuf,
        #[source]
        source: duckdb::Error,
    },

    // Script execution errors
    #[error("Error in {script}: {source}")]
    Execution {
        script: String,
        #[source]
        source: duckdb::Error,
    },

    // Database errors outside of script execution
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("Invalid table name: {0:?}")]
    InvalidIdentifier(String),
}

impl Error {
    /// Create an IO error tagged with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an execution error for a named script
    pub fn execution(script: impl Into<String>, source: duckdb::Error) -> Self {
        Self::Execution {
            script: script.into(),
            source,
        }
    }
}
