//! Tabular previews of query results.
//!
//! A [`Table`] keeps the column names of a result, the first few rows rendered
//! as strings, and the total number of rows the result produced. Only the
//! preview rows are ever held in memory.

use duckdb::arrow::array::{Array, ArrayRef};
use duckdb::arrow::error::ArrowError;
use duckdb::arrow::record_batch::RecordBatch;
use duckdb::arrow::util::display::array_value_to_string;
use std::fmt;

/// Rendered preview of a query result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names, in result order
    pub columns: Vec<String>,
    /// Preview rows, each rendered cell by cell
    pub rows: Vec<Vec<String>>,
    /// Number of rows in the full result
    pub total_rows: usize,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            total_rows: 0,
        }
    }

    /// Append a record batch, keeping at most `limit` rendered rows overall.
    ///
    /// Rows past the limit are only counted.
    pub fn push_batch(&mut self, batch: &RecordBatch, limit: usize) -> Result<(), ArrowError> {
        let remaining = limit.saturating_sub(self.rows.len());
        for row in 0..batch.num_rows().min(remaining) {
            let cells = batch
                .columns()
                .iter()
                .map(|column| render_cell(column, row))
                .collect::<Result<Vec<_>, _>>()?;
            self.rows.push(cells);
        }
        self.total_rows += batch.num_rows();
        Ok(())
    }

    /// Whether the result had more rows than the preview holds.
    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }
}

fn render_cell(column: &ArrayRef, row: usize) -> Result<String, ArrowError> {
    if column.is_null(row) {
        Ok("NULL".to_string())
    } else {
        array_value_to_string(column, row)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .fold(name.chars().count(), usize::max)
            })
            .collect();

        write_line(f, &self.columns, &widths)?;
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", separator.join("-+-"))?;
        for row in &self.rows {
            write_line(f, row, &widths)?;
        }

        if self.rows.is_empty() {
            writeln!(f, "(no rows)")?;
        } else if self.is_truncated() {
            writeln!(f, "(showing {} of {} rows)", self.rows.len(), self.total_rows)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}
