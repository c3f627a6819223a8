//! Table initialization command.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::InitArgs;
use crate::config::Config;

/// Execute init command.
pub fn execute(args: InitArgs, config: &Config) -> Result<()> {
    let db_path = &config.paths.database;
    let csv = args.csv.unwrap_or_else(|| config.paths.csv.clone());
    let table = args.table.unwrap_or_else(|| config.table.name.clone());

    let report = churn_core::initialize(db_path, &csv, &table)
        .with_context(|| format!("Failed to initialize {}", db_path.display()))?;

    if report.created {
        println!(
            "{} Created table {} from {} ({} rows, {} columns)",
            "✓".green(),
            report.table.cyan(),
            csv.display(),
            report.rows,
            report.columns.len()
        );
    } else {
        println!(
            "{} Table {} already exists ({} rows, {} columns), left unchanged",
            "○".yellow(),
            report.table.cyan(),
            report.rows,
            report.columns.len()
        );
    }
    println!("{}", format!("DuckDB initialized at {}", db_path.display()).green());

    Ok(())
}
