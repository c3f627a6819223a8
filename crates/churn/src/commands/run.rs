//! Script batch command.

use anyhow::{Context, Result};
use churn_core::{BatchSummary, Error, Outcome, Reporter};
use colored::Colorize;

use crate::cli::RunArgs;
use crate::config::Config;

/// Execute run command.
pub fn execute(args: RunArgs, config: &Config) -> Result<()> {
    let sql_dir = &config.paths.sql_dir;
    let mut options = config.batch_options();
    if let Some(rows) = args.preview_rows {
        options.preview_rows = rows;
    }

    churn_core::run_batch(&config.paths.database, sql_dir, &options, &mut ConsoleReporter)
        .with_context(|| format!("Batch run of {} aborted", sql_dir.display()))?;

    Ok(())
}

/// Prints batch progress to stdout, errors to stderr.
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn skipped(&mut self, script: &str) {
        println!();
        println!("{}", format!("--- Skipping empty file: {script} ---").yellow());
    }

    fn started(&mut self, script: &str) {
        println!();
        println!("{}", format!("--- Running: {script} ---").cyan().bold());
    }

    fn finished(&mut self, _script: &str, outcome: &Outcome) {
        match outcome {
            Outcome::Rows(table) => print!("{table}"),
            Outcome::NoFetchableResult => {
                println!("{}", "✓ Executed (no fetchable result).".green())
            }
            Outcome::Executed => println!(
                "{}",
                "✓ Executed (DDL/DML script, no result set expected).".green()
            ),
            Outcome::Skipped => {}
        }
    }

    fn failed(&mut self, script: &str, error: &Error) {
        let detail = match error {
            Error::Execution { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        eprintln!("{}", format!("✗ Error in {script}:").red().bold());
        eprintln!("{detail}");
    }

    fn done(&mut self, summary: &BatchSummary) {
        println!();
        println!(
            "{}",
            format!(
                "✓ Done. {} script(s) executed, {} skipped.",
                summary.executed, summary.skipped
            )
            .green()
            .bold()
        );
    }
}
