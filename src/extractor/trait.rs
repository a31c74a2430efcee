use crate::error::ExtractError;
use crate::models::FileType;
use std::path::Path;

/// Trait for text extractors that turn a file into plain text
#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text content from a file
    async fn extract(&self, path: &Path) -> Result<String, ExtractError>;

    /// The document type this extractor handles
    fn file_type(&self) -> FileType;

    /// Check if this extractor supports the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}
