//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Load the customer churn CSV into DuckDB and run SQL script batches
#[derive(Parser, Debug)]
#[command(name = "churn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./churn.toml when present)
    #[arg(long, global = true, env = "CHURN_CONFIG")]
    pub config: Option<PathBuf>,

    /// DuckDB database file
    #[arg(long, global = true, env = "CHURN_DATABASE_PATH")]
    pub db: Option<PathBuf>,

    /// Directory holding the SQL scripts
    #[arg(long, global = true, env = "CHURN_SQL_DIR")]
    pub sql_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the customers table from the CSV dataset (no-op if it exists)
    Init(InitArgs),

    /// Run every SQL script of a directory, in filename order
    Run(RunArgs),

    /// Show database, table and script status
    Status {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show version
    Version,
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// CSV file to load
    #[arg(long, env = "CHURN_CSV_PATH")]
    pub csv: Option<PathBuf>,

    /// Name of the table to create
    #[arg(short, long)]
    pub table: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Maximum rows shown per query result
    #[arg(short = 'n', long)]
    pub preview_rows: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "churn",
            "--db",
            "other.duckdb",
            "run",
            "--sql-dir",
            "queries",
            "-n",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("other.duckdb")));
        assert_eq!(cli.sql_dir, Some(PathBuf::from("queries")));
        match cli.command {
            Commands::Run(args) => assert_eq!(args.preview_rows, Some(5)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["churn", "init", "--db", "x.duckdb", "--table", "t"]).unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("x.duckdb")));
        assert!(matches!(cli.command, Commands::Init(InitArgs { table: Some(ref t), .. }) if t == "t"));
    }

    #[test]
    fn test_parse_status_json() {
        let cli = Cli::try_parse_from(["churn", "status", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { json: true }));
    }

    #[test]
    fn test_sql_dir_applies_to_status() {
        let cli = Cli::try_parse_from(["churn", "status", "--sql-dir", "queries"]).unwrap();
        assert_eq!(cli.sql_dir, Some(PathBuf::from("queries")));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["churn"]).is_err());
    }
}
