//! churn-core - Core library for churn
//!
//! This crate provides the logic behind the churn CLI:
//!
//! - **db**: DuckDB connection handle
//! - **init**: Seed the customers table from a CSV file
//! - **script**: SQL script discovery and classification
//! - **runner**: Fail-fast batch execution of script directories
//! - **table**: Tabular previews of query results

pub mod db;
pub mod error;
pub mod init;
pub mod runner;
pub mod script;
pub mod table;

// Re-export commonly used types
pub use db::Database;
pub use error::{Error, Result};
pub use init::{InitReport, initialize};
pub use runner::{BatchOptions, BatchSummary, Outcome, Reporter, run_batch, run_file};
pub use script::{ScriptKind, classify, discover_scripts};
pub use table::Table;
