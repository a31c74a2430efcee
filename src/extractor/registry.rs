use crate::error::ExtractError;
use crate::extractor::{MarkupExtractor, TabularExtractor, TextExtractor};
use crate::models::FileType;
use crate::utils;
use std::path::Path;
use std::sync::Arc;

/// Registry dispatching extraction by document type
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new registry with the markup and tabular extractors
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(MarkupExtractor::new()));
        registry.register(Arc::new(TabularExtractor::new()));
        registry
    }

    /// Create a registry without any extractor
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Register a new extractor; later registrations win for the same type
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        self.extractors.insert(0, extractor);
    }

    /// Declared type of a file, from its extension
    pub fn resolve(&self, path: &Path) -> Result<FileType, ExtractError> {
        let ext = utils::get_extension(path).unwrap_or_else(|| "<none>".to_string());
        self.extractors
            .iter()
            .find(|extractor| extractor.supports_extension(&ext))
            .map(|extractor| extractor.file_type())
            .ok_or(ExtractError::UnsupportedFormat(ext))
    }

    /// Find the extractor for a document type
    pub fn get(&self, file_type: FileType) -> Option<Arc<dyn TextExtractor>> {
        self.extractors
            .iter()
            .find(|extractor| extractor.file_type() == file_type)
            .cloned()
    }

    /// Extract text from `path` as the declared type
    pub async fn extract(&self, path: &Path, declared: FileType) -> Result<String, ExtractError> {
        let extractor = self
            .get(declared)
            .ok_or_else(|| ExtractError::UnsupportedFormat(declared.to_string()))?;
        extractor.extract(path).await
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
