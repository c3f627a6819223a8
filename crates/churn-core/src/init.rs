//! Seed the customers table from a CSV file.
//!
//! The table is created once with `CREATE TABLE IF NOT EXISTS ... AS SELECT`
//! over DuckDB's `read_csv_auto`, which detects the delimiter, header and
//! column types. Later runs leave an existing table untouched.

use crate::db::{Database, quote_identifier, quote_literal};
use crate::error::{Error, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;

/// Default name of the seeded table
pub const DEFAULT_TABLE: &str = "customers";

/// Shape of the seeded table after initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub table: String,
    /// False when the table already existed and was left as is
    pub created: bool,
    pub rows: u64,
    pub columns: Vec<String>,
}

/// Open (or create) the database at `db_path` and seed `table` from `csv_path`.
pub fn initialize(db_path: &Path, csv_path: &Path, table: &str) -> Result<InitReport> {
    check_readable(csv_path)?;
    let db = Database::open(db_path)?;
    let report = seed_table(&db, csv_path, table)?;
    db.close()?;
    Ok(report)
}

/// Create `table` from `csv_path` on an open database unless it already exists.
pub fn seed_table(db: &Database, csv_path: &Path, table: &str) -> Result<InitReport> {
    check_readable(csv_path)?;
    let existed = db.table_exists(table)?;

    let sql = create_table_sql(table, csv_path)?;
    db.execute_batch(&sql).map_err(|source| Error::Schema {
        csv: csv_path.to_path_buf(),
        source,
    })?;

    let report = InitReport {
        table: table.to_string(),
        created: !existed,
        rows: db.row_count(table)?,
        columns: db.columns(table)?,
    };
    if report.created {
        info!(
            "Created table {} from {:?} ({} rows, {} columns)",
            table,
            csv_path,
            report.rows,
            report.columns.len()
        );
    } else {
        info!("Table {} already exists, leaving it unchanged", table);
    }
    Ok(report)
}

fn create_table_sql(table: &str, csv_path: &Path) -> Result<String> {
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} AS SELECT * FROM read_csv_auto({})",
        quote_identifier(table)?,
        quote_literal(&csv_path.to_string_lossy())
    ))
}

fn check_readable(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let metadata = file.metadata().map_err(|e| Error::io(path, e))?;
    if !metadata.is_file() {
        return Err(Error::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CSV: &str = "id,age,tenure_months,churned\n1,34,12,0\n2,51,40,1\n3,28,3,0\n";

    #[test]
    fn test_initialize_creates_table() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("customers.csv");
        fs::write(&csv, CSV).unwrap();
        let db_path = dir.path().join("churn.duckdb");

        let report = initialize(&db_path, &csv, DEFAULT_TABLE).unwrap();

        assert!(report.created);
        assert_eq!(report.table, "customers");
        assert_eq!(report.rows, 3);
        assert_eq!(
            report.columns,
            vec!["id", "age", "tenure_months", "churned"]
        );
        assert!(db_path.exists());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("customers.csv");
        fs::write(&csv, CSV).unwrap();
        let db_path = dir.path().join("churn.duckdb");

        let first = initialize(&db_path, &csv, DEFAULT_TABLE).unwrap();

        // Changing the CSV must not touch the existing table.
        fs::write(&csv, format!("{CSV}4,60,72,1\n")).unwrap();
        let second = initialize(&db_path, &csv, DEFAULT_TABLE).unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(second.rows, 3);
        assert_eq!(second.columns, first.columns);
    }

    #[test]
    fn test_initialize_missing_csv() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("churn.duckdb");

        let err = initialize(&db_path, &dir.path().join("missing.csv"), DEFAULT_TABLE).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(!db_path.exists());
    }

    #[test]
    fn test_initialize_rejects_directory_as_csv() {
        let dir = tempdir().unwrap();
        let err = initialize(&dir.path().join("churn.duckdb"), dir.path(), DEFAULT_TABLE).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_initialize_unparseable_csv() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("broken.csv");
        fs::write(&csv, b"id,name\n1,\xff\xfe\n2,ok\n").unwrap();

        let err = initialize(&dir.path().join("churn.duckdb"), &csv, DEFAULT_TABLE).unwrap_err();

        assert!(matches!(err, Error::Schema { .. }));
    }

    #[test]
    fn test_initialize_inconsistent_column_counts() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("ragged.csv");
        fs::write(
            &csv,
            "id,age,tenure_months,churned\n1,34,12,0\n2,51\n3,28,3,0\n4,60,72,1,9\n",
        )
        .unwrap();
        let db_path = dir.path().join("churn.duckdb");

        let err = initialize(&db_path, &csv, DEFAULT_TABLE).unwrap_err();

        assert!(matches!(err, Error::Schema { .. }));
        let db = Database::open(&db_path).unwrap();
        assert!(!db.table_exists(DEFAULT_TABLE).unwrap());
    }

    #[test]
    fn test_seed_table_custom_name() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("customers.csv");
        fs::write(&csv, CSV).unwrap();
        let db = Database::open_in_memory().unwrap();

        let report = seed_table(&db, &csv, "churn_input").unwrap();

        assert!(report.created);
        assert!(db.table_exists("churn_input").unwrap());
        assert!(!db.table_exists("customers").unwrap());
    }

    #[test]
    fn test_create_table_sql_escapes() {
        let sql = create_table_sql("customers", Path::new("data/o'brien.csv")).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"customers\" AS SELECT * FROM read_csv_auto('data/o''brien.csv')"
        );
    }
}
