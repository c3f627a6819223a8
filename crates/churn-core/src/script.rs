//! SQL script discovery and classification.
//!
//! Scripts are plain `.sql` files in a single directory. They are run in
//! ascending filename order, and each one is classified by its first keyword
//! as either a query (expected to return rows) or a statement.

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What a script is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Produces a result set worth previewing
    Query,
    /// DDL/DML, no result set expected
    Statement,
}

/// Classify a script by its leading keyword.
///
/// This is a prefix check on the trimmed, lower-cased text, not a parser:
/// anything starting with `select` or `with` is a [`ScriptKind::Query`].
pub fn classify(sql: &str) -> ScriptKind {
    let text = sql.trim().to_lowercase();
    if text.starts_with("select") || text.starts_with("with") {
        ScriptKind::Query
    } else {
        ScriptKind::Statement
    }
}

/// Split a script into everything before its final statement and the final
/// statement itself.
///
/// Semicolons inside quoted strings (including `E'...'` escape strings and
/// `$tag$...$tag$` dollar quoting), quoted identifiers and comments do not
/// end a statement. Trailing empty or comment-only segments are ignored. If
/// the script holds a single statement the leading part is `None`.
pub fn split_last_statement(sql: &str) -> (Option<&str>, &str) {
    // Start offsets of segments that contain code, i.e. anything but
    // whitespace and comments.
    let mut code_segments = Vec::new();
    let mut segment_start = 0;
    let mut segment_has_code = false;

    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                segment_has_code = true;
                let backslash_escapes = quote == b'\''
                    && i > 0
                    && matches!(bytes[i - 1], b'E' | b'e')
                    && (i < 2 || !is_identifier_byte(bytes[i - 2]));
                i += 1;
                // A doubled quote is an escaped quote and keeps the literal open.
                while i < bytes.len() {
                    if backslash_escapes && bytes[i] == b'\\' {
                        i += 1;
                    } else if bytes[i] == quote {
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 1;
                        } else {
                            break;
                        }
                    }
                    i += 1;
                }
            }
            b'$' => {
                segment_has_code = true;
                if let Some(delimiter) = dollar_quote_delimiter(&sql[i..]) {
                    let body = i + delimiter.len();
                    i = match sql[body..].find(delimiter) {
                        Some(end) => body + end + delimiter.len() - 1,
                        None => bytes.len(),
                    };
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 1;
            }
            b';' => {
                if segment_has_code {
                    code_segments.push(segment_start);
                }
                segment_start = i + 1;
                segment_has_code = false;
            }
            byte if !byte.is_ascii_whitespace() => segment_has_code = true,
            _ => {}
        }
        i += 1;
    }
    if segment_has_code {
        code_segments.push(segment_start);
    }

    match code_segments.last() {
        Some(&start) if start > 0 => {
            let leading = &sql[..start];
            let last = sql[start..].trim();
            let last = last.strip_suffix(';').unwrap_or(last).trim_end();
            (Some(leading), last)
        }
        _ => (None, sql),
    }
}

/// The `$tag$` delimiter opening a dollar-quoted string at the start of
/// `rest`, if any. `$1`-style parameters are not delimiters.
fn dollar_quote_delimiter(rest: &str) -> Option<&str> {
    let bytes = rest.as_bytes();
    let tag_len = bytes[1..].iter().take_while(|b| is_identifier_byte(**b)).count();
    if bytes.get(1 + tag_len) != Some(&b'$') || bytes[1].is_ascii_digit() {
        return None;
    }
    Some(&rest[..tag_len + 2])
}

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// List the scripts of `dir` with the given extension, sorted by filename.
///
/// The listing is not recursive. A directory that does not exist holds no
/// scripts.
pub fn discover_scripts(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Script directory {:?} does not exist", dir);
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut scripts = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            scripts.push(path);
        }
    }
    scripts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!("Found {} script(s) in {:?}", scripts.len(), dir);
    Ok(scripts)
}

/// Display name of a script: its filename, or the full path if it has none.
pub fn script_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classify_queries() {
        assert_eq!(classify("SELECT * FROM customers"), ScriptKind::Query);
        assert_eq!(classify("  \n\tselect 1  \n"), ScriptKind::Query);
        assert_eq!(
            classify("WITH t AS (SELECT 1) SELECT * FROM t"),
            ScriptKind::Query
        );
        assert_eq!(classify("With x as (select 1) select * from x"), ScriptKind::Query);
    }

    #[test]
    fn test_classify_statements() {
        assert_eq!(
            classify("CREATE VIEW v AS SELECT * FROM customers"),
            ScriptKind::Statement
        );
        assert_eq!(classify("insert into t values (1)"), ScriptKind::Statement);
        assert_eq!(classify("-- comment\nSELECT 1"), ScriptKind::Statement);
        assert_eq!(classify(""), ScriptKind::Statement);
    }

    #[test]
    fn test_classify_is_a_prefix_heuristic() {
        // Only the first keyword counts, even when it is a longer word.
        assert_eq!(classify("selection_sort();"), ScriptKind::Query);
        assert_eq!(classify("DROP TABLE x; SELECT 1"), ScriptKind::Statement);
    }

    #[test]
    fn test_split_single_statement() {
        assert_eq!(split_last_statement("SELECT 1"), (None, "SELECT 1"));
        assert_eq!(split_last_statement("SELECT 1;"), (None, "SELECT 1;"));
        assert_eq!(
            split_last_statement("SELECT 1; -- trailing note\n"),
            (None, "SELECT 1; -- trailing note\n")
        );
    }

    #[test]
    fn test_split_multiple_statements() {
        let (leading, last) = split_last_statement("SELECT 1;\nSELECT 2;\n");
        assert_eq!(leading, Some("SELECT 1;"));
        assert_eq!(last, "SELECT 2");
    }

    #[test]
    fn test_split_ignores_semicolons_in_literals_and_comments() {
        let sql = "SELECT 'a;b' AS \"x;y\"; /* c; d */ -- e;\nSELECT ';'";
        let (leading, last) = split_last_statement(sql);
        assert_eq!(leading, Some("SELECT 'a;b' AS \"x;y\";"));
        assert_eq!(last, "/* c; d */ -- e;\nSELECT ';'");
    }

    #[test]
    fn test_split_handles_escaped_quotes() {
        let (leading, last) = split_last_statement("SELECT 'it''s; fine'; SELECT 2");
        assert_eq!(leading, Some("SELECT 'it''s; fine';"));
        assert_eq!(last, "SELECT 2");
    }

    #[test]
    fn test_split_handles_dollar_quoting() {
        assert_eq!(split_last_statement("SELECT $$a;b$$ AS s"), (None, "SELECT $$a;b$$ AS s"));

        let sql = "SELECT $body$ x; $$ y; $body$ AS s; SELECT 2";
        let (leading, last) = split_last_statement(sql);
        assert_eq!(leading, Some("SELECT $body$ x; $$ y; $body$ AS s;"));
        assert_eq!(last, "SELECT 2");
    }

    #[test]
    fn test_split_dollar_parameters_are_not_quotes() {
        let (leading, last) = split_last_statement("SELECT $1; SELECT $2");
        assert_eq!(leading, Some("SELECT $1;"));
        assert_eq!(last, "SELECT $2");
    }

    #[test]
    fn test_split_handles_backslash_escape_strings() {
        assert_eq!(
            split_last_statement(r"SELECT E'x\';y' AS s"),
            (None, r"SELECT E'x\';y' AS s")
        );

        let (leading, last) = split_last_statement(r"SELECT e'\\'; SELECT 'plain\'");
        assert_eq!(leading, Some(r"SELECT e'\\';"));
        assert_eq!(last, r"SELECT 'plain\'");
    }

    #[test]
    fn test_discover_scripts_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("02_second.sql"), "SELECT 2").unwrap();
        fs::write(dir.path().join("01_first.sql"), "SELECT 1").unwrap();
        fs::write(dir.path().join("10_tenth.sql"), "SELECT 10").unwrap();
        fs::write(dir.path().join("notes.txt"), "not sql").unwrap();
        fs::create_dir(dir.path().join("nested.sql")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("00_hidden.sql"), "SELECT 0").unwrap();

        let scripts = discover_scripts(dir.path(), "sql").unwrap();
        let names: Vec<String> = scripts.iter().map(|p| script_name(p)).collect();
        assert_eq!(names, vec!["01_first.sql", "02_second.sql", "10_tenth.sql"]);
    }

    #[test]
    fn test_discover_scripts_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let scripts = discover_scripts(&dir.path().join("missing"), "sql").unwrap();
        assert!(scripts.is_empty());
    }
}
