//! File-level runner used by the CLI.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, SqlRiverError};
use crate::formatter::format_string;
use crate::lexer;
use crate::report::{FileResult, FileStatus, Report};
use crate::token::Token;

/// File extensions treated as SQL sources.
const SQL_EXTENSIONS: [&str; 2] = ["sql", "dml"];

/// Behavior flags for a file run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Report instead of writing; exit status signals changes.
    pub check: bool,
    /// Print a unified diff instead of writing.
    pub diff: bool,
}

impl RunOptions {
    fn writes_files(&self) -> bool {
        !self.check && !self.diff
    }
}

/// Format every SQL file reachable from the given paths.
pub fn run(paths: &[PathBuf], options: &RunOptions) -> Report {
    let mut report = Report::new();
    for path in matching_paths(paths) {
        report.add(format_file(&path, options));
    }
    report
}

fn format_file(path: &Path, options: &RunOptions) -> FileResult {
    match try_format_file(path, options) {
        Ok(status) => FileResult {
            path: path.to_path_buf(),
            status,
            error: None,
        },
        Err(e) => FileResult {
            path: path.to_path_buf(),
            status: FileStatus::Error,
            error: Some(e.to_string()),
        },
    }
}

fn try_format_file(path: &Path, options: &RunOptions) -> Result<FileStatus> {
    let source = std::fs::read_to_string(path)?;
    let formatted = format_string(&source)?;
    safety_check(&source, &formatted)?;

    if source == formatted {
        return Ok(FileStatus::Unchanged);
    }

    if options.diff {
        print_diff(path, &source, &formatted);
    }
    if options.writes_files() {
        std::fs::write(path, &formatted)?;
    }
    Ok(FileStatus::Changed)
}

/// Collect the SQL files under the given paths, deduplicated and sorted.
pub fn matching_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    for path in paths {
        if path.is_dir() {
            collect_sql_files(path, &mut found);
        } else if is_sql_file(path) {
            found.insert(path.clone());
        }
    }
    found.into_iter().collect()
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .is_some_and(|ext| SQL_EXTENSIONS.contains(&ext.as_str()))
}

fn collect_sql_files(dir: &Path, found: &mut BTreeSet<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let hidden = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if hidden {
            continue;
        }
        if path.is_dir() {
            collect_sql_files(&path, found);
        } else if is_sql_file(&path) {
            found.insert(path);
        }
    }
}

/// Re-lex the formatted output and verify the non-whitespace token
/// sequence matches the input, modulo keyword casing and phrase-interior
/// whitespace. A mismatch means the formatter mangled the query.
fn safety_check(original: &str, formatted: &str) -> Result<()> {
    let before = significant_tokens(original);
    let after = significant_tokens(formatted);

    if before.len() != after.len() {
        return Err(SqlRiverError::Equivalence(format!(
            "token count changed from {} to {}",
            before.len(),
            after.len()
        )));
    }

    for (i, (b, a)) in before.iter().zip(after.iter()).enumerate() {
        if b != a {
            return Err(SqlRiverError::Equivalence(format!(
                "token {i} changed from '{b}' to '{a}'"
            )));
        }
    }
    Ok(())
}

fn significant_tokens(source: &str) -> Vec<String> {
    lexer::tokenize(source)
        .iter()
        .filter(|t| !t.is_whitespace())
        .map(normalized_text)
        .collect()
}

fn normalized_text(token: &Token) -> String {
    token
        .text()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unified line diff on stderr.
fn print_diff(path: &Path, original: &str, formatted: &str) {
    use similar::{ChangeTag, TextDiff};

    eprintln!("--- {}", path.display());
    eprintln!("+++ {}", path.display());

    let diff = TextDiff::from_lines(original, formatted);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        eprint!("{}{}", sign, change);
    }
}
