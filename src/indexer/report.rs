use crate::error::IndexError;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happened to one discovered file
#[derive(Debug)]
pub enum FileOutcome {
    /// Extracted, embedded and stored
    Indexed { path: PathBuf, id: String },
    /// Its id was already present, either from an earlier run or from a
    /// same-named file earlier in this run
    AlreadyIndexed { path: PathBuf, id: String },
    /// Processing failed; the run moved on
    Failed {
        path: PathBuf,
        id: String,
        error: IndexError,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Indexed { path, .. }
            | Self::AlreadyIndexed { path, .. }
            | Self::Failed { path, .. } => path,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Indexed { id, .. } | Self::AlreadyIndexed { id, .. } | Self::Failed { id, .. } => {
                id
            }
        }
    }
}

/// Summary of one indexing run
#[derive(Debug)]
pub struct IndexReport {
    pub root: PathBuf,
    pub started_at: DateTime<Local>,
    pub duration: Duration,
    pub files_found: usize,
    /// One entry per discovered file, in sorted path order
    pub outcomes: Vec<FileOutcome>,
}

impl IndexReport {
    pub fn indexed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Indexed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::AlreadyIndexed { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Failed files with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &IndexError)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { path, error, .. } => Some((path.as_path(), error)),
            _ => None,
        })
    }
}

impl fmt::Display for IndexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} found, {} indexed, {} skipped, {} failed in {:.2}s (started {})",
            self.root.display(),
            self.files_found,
            self.indexed(),
            self.skipped(),
            self.failed(),
            self.duration.as_secs_f64(),
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    fn report() -> IndexReport {
        IndexReport {
            root: PathBuf::from("/data"),
            started_at: Local::now(),
            duration: Duration::from_millis(1500),
            files_found: 4,
            outcomes: vec![
                FileOutcome::Indexed {
                    path: PathBuf::from("/data/a.html"),
                    id: "doc_a.html".to_string(),
                },
                FileOutcome::AlreadyIndexed {
                    path: PathBuf::from("/data/b.html"),
                    id: "doc_b.html".to_string(),
                },
                FileOutcome::Failed {
                    path: PathBuf::from("/data/c.txt"),
                    id: "doc_c.txt".to_string(),
                    error: ExtractError::UnsupportedFormat("txt".to_string()).into(),
                },
                FileOutcome::Indexed {
                    path: PathBuf::from("/data/d.csv"),
                    id: "doc_d.csv".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_report_counts() {
        let report = report();
        assert_eq!(report.indexed(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);

        let (path, error) = report.failures().next().unwrap();
        assert_eq!(path, Path::new("/data/c.txt"));
        assert!(error.to_string().contains("unsupported file format: txt"));
    }

    #[test]
    fn test_outcome_accessors() {
        let report = report();
        assert_eq!(report.outcomes[1].path(), Path::new("/data/b.html"));
        assert_eq!(report.outcomes[2].id(), "doc_c.txt");
    }

    #[test]
    fn test_report_display() {
        let text = report().to_string();
        assert!(text.starts_with("/data: 4 found, 2 indexed, 1 skipped, 1 failed in 1.50s"));
    }
}
