//! Error types for indexing, extraction and store round trips.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by an indexing run.
///
/// Only [`IndexError::DirectoryNotFound`] and collection initialization
/// failures escape a run; everything else is recorded per file.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Discovery root is missing or not a directory
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Text extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Vector store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Anything else that went wrong while processing a single file
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Text extraction errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Vector store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid collection name: {0:?}")]
    InvalidName(String),

    #[error("collection already exists: {0}")]
    AlreadyExists(String),

    #[error("collection not found: {0}")]
    NotFound(String),

    #[error("collection {collection} is corrupt at line {line}: {message}")]
    Corrupt {
        collection: String,
        line: usize,
        message: String,
    },

    #[error("duplicate document id: {0}")]
    DuplicateId(String),

    #[error("embedding dimension mismatch: got {got}, expected {expected}")]
    DimensionMismatch { got: usize, expected: usize },

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_names_extension() {
        let err = ExtractError::UnsupportedFormat("txt".to_string());
        assert_eq!(err.to_string(), "unsupported file format: txt");
    }

    #[test]
    fn test_io_error_names_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ExtractError::io("/data/a.html", io_err);
        assert!(err.to_string().contains("/data/a.html"));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_directory_not_found_display() {
        let err = IndexError::DirectoryNotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "directory not found: /missing");
    }

    #[test]
    fn test_index_error_from_extract_error() {
        let err: IndexError = ExtractError::UnsupportedFormat("pdf".to_string()).into();
        assert!(matches!(
            err,
            IndexError::Extraction(ExtractError::UnsupportedFormat(_))
        ));
        assert!(err.to_string().contains("pdf"));
    }

    #[test]
    fn test_index_error_from_store_error() {
        let err: IndexError = StoreError::DuplicateId("doc_a.html".to_string()).into();
        assert!(matches!(err, IndexError::Store(StoreError::DuplicateId(_))));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = StoreError::DimensionMismatch {
            got: 3,
            expected: 384,
        };
        assert_eq!(
            err.to_string(),
            "embedding dimension mismatch: got 3, expected 384"
        );
    }
}
