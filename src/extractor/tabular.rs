use crate::error::ExtractError;
use crate::extractor::TextExtractor;
use crate::models::FileType;
use crate::utils;
use std::path::{Path, PathBuf};

/// Tabular (CSV/TSV) extractor: flattens every cell, header row included,
/// in row-major order
pub struct TabularExtractor;

impl TabularExtractor {
    pub fn new() -> Self {
        Self
    }

    fn delimiter_for(path: &Path) -> u8 {
        match utils::get_extension(path).as_deref() {
            Some("tsv") => b'\t',
            _ => b',',
        }
    }

    fn flatten(path: PathBuf) -> Result<String, ExtractError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(Self::delimiter_for(&path))
            .from_path(&path)
            .map_err(|e| Self::map_csv_error(&path, e))?;

        let mut cells = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Self::map_csv_error(&path, e))?;
            cells.extend(
                record
                    .iter()
                    .map(str::trim)
                    .filter(|cell| !cell.is_empty())
                    .map(str::to_string),
            );
        }

        Ok(cells.join(" "))
    }

    fn map_csv_error(path: &Path, err: csv::Error) -> ExtractError {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => ExtractError::io(path, e),
            kind => ExtractError::Parse {
                path: path.to_path_buf(),
                message: format!("{:?}", kind),
            },
        }
    }
}

impl Default for TabularExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextExtractor for TabularExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::flatten(owned))
            .await
            .map_err(|e| ExtractError::Parse {
                path: path.to_path_buf(),
                message: format!("extraction task failed: {}", e),
            })?
    }

    fn file_type(&self) -> FileType {
        FileType::Tabular
    }

    fn supports_extension(&self, ext: &str) -> bool {
        FileType::from_extension(ext) == Some(FileType::Tabular)
    }
}
