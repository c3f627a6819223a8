//! Fail-fast batch execution of SQL script directories.
//!
//! A batch opens one connection, runs every script of a directory in filename
//! order and stops at the first script that fails. Progress is reported
//! through a [`Reporter`] so the CLI can print it while tests record it.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::script::{ScriptKind, classify, discover_scripts, script_name};
use crate::table::Table;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Number of rows shown for each query result by default
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Extension of script files by default
pub const DEFAULT_EXTENSION: &str = "sql";

/// Batch run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Only files with this extension are run
    pub extension: String,
    /// Maximum rows previewed per query result
    pub preview_rows: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Result of running a single script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file was empty or whitespace only and was not executed
    Skipped,
    /// A statement script ran; no result set was expected
    Executed,
    /// A query script ran and its result was fetched
    Rows(Table),
    /// A query script ran but left no fetchable result
    NoFetchableResult,
}

/// Counts for a completed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub executed: usize,
    pub skipped: usize,
}

/// Receives progress events from a batch run.
pub trait Reporter {
    /// A script was empty and will not run
    fn skipped(&mut self, script: &str);

    /// A script is about to be submitted
    fn started(&mut self, script: &str);

    /// A script ran successfully
    fn finished(&mut self, script: &str, outcome: &Outcome);

    /// A script failed; the batch stops after this
    fn failed(&mut self, script: &str, error: &Error);

    /// Every script ran
    fn done(&mut self, summary: &BatchSummary);
}

/// Run a single script file against an open database.
pub fn run_file<R: Reporter + ?Sized>(
    db: &Database,
    path: &Path,
    options: &BatchOptions,
    reporter: &mut R,
) -> Result<Outcome> {
    let name = script_name(path);
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let sql = text.trim();

    if sql.is_empty() {
        reporter.skipped(&name);
        return Ok(Outcome::Skipped);
    }

    reporter.started(&name);
    let kind = classify(sql);
    debug!("Running {} as {:?}", name, kind);

    let executed = match kind {
        ScriptKind::Query => db.query(sql, options.preview_rows).map(|fetched| match fetched {
            Some(table) => Outcome::Rows(table),
            None => Outcome::NoFetchableResult,
        }),
        ScriptKind::Statement => db.execute_batch(sql).map(|()| Outcome::Executed),
    };

    match executed {
        Ok(outcome) => {
            reporter.finished(&name, &outcome);
            Ok(outcome)
        }
        Err(source) => {
            let error = Error::execution(&name, source);
            reporter.failed(&name, &error);
            Err(error)
        }
    }
}

/// Run every script of `sql_dir` against the database at `db_path`.
///
/// Stops at the first failing script and returns its error. The connection is
/// released whether the batch completes or not.
pub fn run_batch<R: Reporter + ?Sized>(
    db_path: &Path,
    sql_dir: &Path,
    options: &BatchOptions,
    reporter: &mut R,
) -> Result<BatchSummary> {
    let db = Database::open(db_path)?;
    let scripts = discover_scripts(sql_dir, &options.extension)?;
    info!("Running {} script(s) from {:?}", scripts.len(), sql_dir);

    let mut summary = BatchSummary::default();
    for path in &scripts {
        // `db` drops on this early return, releasing the connection.
        match run_file(&db, path, options, reporter)? {
            Outcome::Skipped => summary.skipped += 1,
            _ => summary.executed += 1,
        }
    }

    db.close()?;
    reporter.done(&summary);
    Ok(summary)
}
