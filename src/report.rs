use std::path::PathBuf;

/// Outcome of processing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Already in river style.
    Unchanged,
    /// Rewritten (or would be, under --check/--diff).
    Changed,
    /// Could not be processed.
    Error,
}

#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub error: Option<String>,
}

/// Aggregated results of a formatting run.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(FileStatus::Error) > 0
    }

    pub fn has_changes(&self) -> bool {
        self.count(FileStatus::Changed) > 0
    }

    /// One-line run summary.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} file(s) processed", self.results.len())];
        for (status, label) in [
            (FileStatus::Changed, "reformatted"),
            (FileStatus::Unchanged, "unchanged"),
            (FileStatus::Error, "error(s)"),
        ] {
            let n = self.count(status);
            if n > 0 {
                parts.push(format!("{n} {label}"));
            }
        }
        parts.join(", ")
    }

    pub fn print_errors(&self) {
        for result in &self.results {
            if let Some(ref error) = result.error {
                eprintln!("error: {}: {}", result.path.display(), error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(path: &str, status: FileStatus) -> FileResult {
        FileResult {
            path: PathBuf::from(path),
            status,
            error: (status == FileStatus::Error).then(|| "boom".to_string()),
        }
    }

    #[test]
    fn test_counts_and_summary() {
        let mut report = Report::new();
        report.add(result("a.sql", FileStatus::Changed));
        report.add(result("b.sql", FileStatus::Unchanged));
        report.add(result("c.sql", FileStatus::Error));

        assert_eq!(report.count(FileStatus::Changed), 1);
        assert_eq!(report.count(FileStatus::Unchanged), 1);
        assert_eq!(report.count(FileStatus::Error), 1);
        assert!(report.has_errors());
        assert!(report.has_changes());
        assert_eq!(
            report.summary(),
            "3 file(s) processed, 1 reformatted, 1 unchanged, 1 error(s)"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new();
        assert!(!report.has_errors());
        assert!(!report.has_changes());
        assert_eq!(report.summary(), "0 file(s) processed");
    }
}
