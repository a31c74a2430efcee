//! Recursive discovery of indexable files.

use crate::error::IndexError;
use crate::utils;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Walks a directory tree and collects files by extension
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    extensions: Vec<String>,
}

impl FileDiscovery {
    /// Create a discovery for the given extensions (`html` or `.html`)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| utils::normalize_extension(ext.as_ref()).to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Check whether a path carries one of the configured extensions.
    /// Matching is case-sensitive.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    /// Return the set of matching files below `root`.
    ///
    /// Symlinked directories are not descended. Symlinks to files count as
    /// files; when several paths resolve to the same file only the first in
    /// sorted order is kept.
    pub fn discover(&self, root: &Path) -> Result<BTreeSet<PathBuf>, IndexError> {
        if !root.is_dir() {
            return Err(IndexError::DirectoryNotFound(root.to_path_buf()));
        }

        let mut candidates = BTreeSet::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && self.matches(entry.path()) {
                candidates.insert(entry.into_path());
            }
        }

        let mut seen = HashSet::new();
        let files = candidates
            .into_iter()
            .filter(|path| {
                let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                seen.insert(target)
            })
            .collect();

        Ok(files)
    }
}
