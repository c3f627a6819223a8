//! churn - customer churn analysis runner
//!
//! Loads the customer CSV into a DuckDB table and runs directories of SQL
//! scripts against it.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration, then let flags and their env vars take precedence
    let mut config = config::Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.db, cli.sql_dir);

    // Initialize tracing, keeping stdout for reports
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Init(args) => commands::init::execute(args, &config),
        Commands::Run(args) => commands::run::execute(args, &config),
        Commands::Status { json } => commands::status::execute(json, &config),
        Commands::Version => {
            println!("churn {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
