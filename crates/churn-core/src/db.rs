//! DuckDB database access for churn.
//!
//! [`Database`] owns a single connection. Dropping the handle releases the
//! connection, so every early return in the callers gives it back to the
//! engine; [`Database::close`] is for the success path, where close errors
//! should surface.

use crate::error::{Error, Result};
use crate::script::split_last_statement;
use crate::table::Table;
use duckdb::{Connection, params};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open the database file at `path`, creating it if absent
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!("Opened database at {:?}", path);
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a transient in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Path of the database file, if it is file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Execute one or more statements, discarding any results.
    pub fn execute_batch(&self, sql: &str) -> duckdb::Result<()> {
        debug!("Executing batch ({} bytes)", sql.len());
        self.conn.execute_batch(sql)
    }

    /// Execute a query script and fetch a preview of its final result.
    ///
    /// A single-statement script is handed to the engine as is. Otherwise the
    /// statements before the last one run as a batch and the last one is
    /// fetched. Errors raised while executing are returned; a result that
    /// executes but cannot be fetched yields `Ok(None)` and the reason is
    /// logged.
    pub fn query(&self, sql: &str, limit: usize) -> duckdb::Result<Option<Table>> {
        let mut stmt = match self.conn.prepare(sql) {
            Ok(stmt) => stmt,
            Err(whole) => {
                let (leading, last) = split_last_statement(sql);
                let Some(leading) = leading else {
                    return Err(whole);
                };
                if let Err(e) = self.execute_batch(leading) {
                    return self.execute_unsplit(sql, e);
                }
                self.conn.prepare(last)?
            }
        };

        let result = stmt.query_arrow([])?;

        let columns: Vec<String> = result
            .get_schema()
            .fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect();
        if columns.is_empty() {
            warn!("Query produced no result columns");
            return Ok(None);
        }

        let mut table = Table::new(columns);
        for batch in result {
            if let Err(e) = table.push_batch(&batch, limit) {
                warn!("Could not render query result: {}", e);
                return Ok(None);
            }
        }
        Ok(Some(table))
    }

    /// Run a whole script whose split prefix did not parse on its own.
    ///
    /// Parse errors come before any statement runs, so nothing of the prefix
    /// has executed yet. Other prefix errors are returned unchanged.
    fn execute_unsplit(&self, sql: &str, prefix_error: duckdb::Error) -> duckdb::Result<Option<Table>> {
        if !is_parse_error(&prefix_error) {
            return Err(prefix_error);
        }
        debug!("Split prefix did not parse ({}), running script whole", prefix_error);
        self.execute_batch(sql)?;
        warn!("Script ran as a whole; its final result cannot be fetched");
        Ok(None)
    }

    /// Check whether a table or view with this name exists
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT count(*) FROM information_schema.tables WHERE table_name = ?",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Count the rows of a table
    pub fn row_count(&self, name: &str) -> Result<u64> {
        let sql = format!("SELECT count(*) FROM {}", quote_identifier(name)?);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Column names of a table, in declaration order
    pub fn columns(&self, name: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT column_name FROM information_schema.columns
             WHERE table_name = ?
             ORDER BY ordinal_position",
        )?;
        let columns = stmt
            .query_map(params![name], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(columns)
    }

    /// Close the connection, reporting any error the engine raises
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| Error::Database(e))?;
        debug!("Closed database {:?}", path);
        Ok(())
    }
}

fn is_parse_error(error: &duckdb::Error) -> bool {
    error.to_string().contains("Parser Error")
}

/// Quote a SQL identifier, doubling embedded double quotes.
pub fn quote_identifier(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(Error::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote a SQL string literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
