//! Status command.

use anyhow::{Context, Result};
use churn_core::script::script_name;
use churn_core::{Database, discover_scripts};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Config;

/// Snapshot of the database file, seeded table and script directory.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub database: PathBuf,
    pub database_exists: bool,
    pub table: TableStatus,
    pub sql_dir: PathBuf,
    pub scripts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TableStatus {
    pub name: String,
    pub exists: bool,
    pub rows: Option<u64>,
    pub columns: Vec<String>,
}

/// Execute status command.
pub fn execute(json: bool, config: &Config) -> Result<()> {
    let report = collect(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "churn Status".cyan().bold());
    println!("{}", "─".repeat(50));
    println!();

    print!("  Database ({}): ", report.database.display());
    if report.database_exists {
        println!("{}", "✓ exists".green());
    } else {
        println!("{}", "○ not created (run churn init)".yellow());
    }

    print!("  Table {}: ", report.table.name);
    match report.table.rows {
        Some(rows) if report.table.exists => println!(
            "{}",
            format!("✓ {} rows, {} columns", rows, report.table.columns.len()).green()
        ),
        _ => println!("{}", "○ missing".yellow()),
    }
    if !report.table.columns.is_empty() {
        println!("    {}", report.table.columns.join(", "));
    }

    println!();
    println!(
        "  {} {} ({})",
        "Scripts:".cyan(),
        report.scripts.len(),
        report.sql_dir.display()
    );
    for script in &report.scripts {
        println!("    • {}", script);
    }

    Ok(())
}

fn collect(config: &Config) -> Result<StatusReport> {
    let db_path = &config.paths.database;
    let database_exists = db_path.exists();
    let mut table = TableStatus {
        name: config.table.name.clone(),
        exists: false,
        rows: None,
        columns: Vec::new(),
    };

    // Opening would create the file, so only inspect an existing one.
    if database_exists {
        let db = Database::open(db_path).context("Failed to open database")?;
        if db.table_exists(&table.name)? {
            table.exists = true;
            table.rows = Some(db.row_count(&table.name)?);
            table.columns = db.columns(&table.name)?;
        }
        db.close()?;
    }

    let scripts: Vec<String> = discover_scripts(&config.paths.sql_dir, &config.runner.extension)?
        .iter()
        .map(|path| script_name(path))
        .collect();

    Ok(StatusReport {
        database: db_path.clone(),
        database_exists,
        table,
        sql_dir: config.paths.sql_dir.clone(),
        scripts,
    })
}
