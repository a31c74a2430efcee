use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Metadata attached to every stored document
pub type Metadata = BTreeMap<String, String>;

/// Prefix of every derived document id
pub const DOC_ID_PREFIX: &str = "doc_";

/// Number of characters kept in `SearchResult::content`
pub const CONTENT_PREVIEW_CHARS: usize = 200;

/// Kind of document, which decides how text is extracted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// HTML-like markup
    Markup,
    /// Delimited tables (CSV, TSV)
    Tabular,
}

impl FileType {
    /// Resolve the file type from a lowercase extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "html" | "htm" | "xhtml" => Some(Self::Markup),
            "csv" | "tsv" => Some(Self::Tabular),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Tabular => "tabular",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the document id for a path: `doc_<filename>`.
///
/// Only the file name takes part, so the id does not depend on content or on
/// the directory the file lives in.
pub fn document_id(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", DOC_ID_PREFIX, name)
}

/// Build the metadata stored alongside a document
pub fn document_metadata(path: &Path, file_type: FileType) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("source".to_string(), path.to_string_lossy().into_owned());
    metadata.insert("file_type".to_string(), file_type.as_str().to_string());
    metadata.insert(
        "filename".to_string(),
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    metadata
}

/// Handle to a named collection in the vector store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionHandle {
    name: String,
}

impl CollectionHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Distance metric a vector store reports in query results
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - cosine similarity`; bounded
    Cosine,
    /// Euclidean distance; unbounded
    L2,
}

impl DistanceMetric {
    /// Convert a store distance into a similarity score (higher is better)
    pub fn score(&self, distance: f32) -> f32 {
        match self {
            Self::Cosine => 1.0 - distance,
            Self::L2 => 1.0 / (1.0 + distance.max(0.0)),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cosine => f.write_str("cosine"),
            Self::L2 => f.write_str("l2"),
        }
    }
}

/// One raw hit returned by a similarity query, nearest first
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub id: String,
    pub document: String,
    pub metadata: Metadata,
    pub distance: f32,
}

/// A ranked search result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Path of the source document
    pub source: String,
    /// First characters of the document text
    pub content: String,
    /// Full metadata as stored
    pub metadata: Metadata,
    /// Similarity score derived from the store distance
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_document_id_uses_file_name() {
        assert_eq!(document_id(Path::new("notes.html")), "doc_notes.html");
        assert_eq!(
            document_id(Path::new("/data/archive/notes.html")),
            "doc_notes.html"
        );
    }

    #[test]
    fn test_document_id_is_content_independent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.html");
        std::fs::write(&path, "<p>first</p>").unwrap();
        let first = document_id(&path);
        std::fs::write(&path, "<p>second</p>").unwrap();
        assert_eq!(first, document_id(&path));
    }

    #[test]
    fn test_file_type_from_extension() {
        assert_eq!(FileType::from_extension("html"), Some(FileType::Markup));
        assert_eq!(FileType::from_extension("htm"), Some(FileType::Markup));
        assert_eq!(FileType::from_extension("csv"), Some(FileType::Tabular));
        assert_eq!(FileType::from_extension("tsv"), Some(FileType::Tabular));
        assert_eq!(FileType::from_extension("txt"), None);
    }

    #[test]
    fn test_document_metadata() {
        let path = PathBuf::from("/data/report.csv");
        let meta = document_metadata(&path, FileType::Tabular);
        assert_eq!(meta.get("source").map(String::as_str), Some("/data/report.csv"));
        assert_eq!(meta.get("file_type").map(String::as_str), Some("tabular"));
        assert_eq!(meta.get("filename").map(String::as_str), Some("report.csv"));
        assert_eq!(meta.len(), 3);
    }

    #[test]
    fn test_cosine_score() {
        let metric = DistanceMetric::Cosine;
        assert!((metric.score(0.1) - 0.9).abs() < 1e-6);
        assert!((metric.score(0.9) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_l2_score_is_bounded_and_decreasing() {
        let metric = DistanceMetric::L2;
        assert_eq!(metric.score(0.0), 1.0);
        assert!(metric.score(4.0) > metric.score(9.0));
        assert!(metric.score(1000.0) > 0.0);
    }

    #[test]
    fn test_search_result_serialization() {
        let result = SearchResult {
            source: "/data/a.html".to_string(),
            content: "hello".to_string(),
            metadata: document_metadata(Path::new("/data/a.html"), FileType::Markup),
            score: 0.5,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
