use crate::discovery::FileDiscovery;
use crate::error::IndexError;
use crate::extractor::ExtractorRegistry;
use crate::indexer::{FileOutcome, IndexReport};
use crate::models::{self, CollectionHandle};
use crate::store::IndexStore;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Indexes a directory tree into one collection.
///
/// Files are processed one after another; a failing file is recorded in the
/// report and never stops the run.
pub struct DocumentIndexer {
    store: Arc<IndexStore>,
    collection: CollectionHandle,
    discovery: FileDiscovery,
    extractors: Arc<ExtractorRegistry>,
    show_progress: bool,
}

impl DocumentIndexer {
    /// Create an indexer bound to `collection_name`, creating the collection
    /// if needed. Failing to open it is fatal.
    pub async fn new<S: AsRef<str>>(
        store: Arc<IndexStore>,
        collection_name: &str,
        extensions: &[S],
    ) -> Result<Self, IndexError> {
        let collection = store.get_or_create_collection(collection_name).await?;
        Ok(Self {
            store,
            collection,
            discovery: FileDiscovery::new(extensions),
            extractors: Arc::new(ExtractorRegistry::new()),
            show_progress: false,
        })
    }

    /// Replace the extractor registry
    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = Arc::new(extractors);
        self
    }

    /// Show a progress bar on stderr during runs
    pub fn set_progress(&mut self, show: bool) {
        self.show_progress = show;
    }

    pub fn collection(&self) -> &CollectionHandle {
        &self.collection
    }

    /// Index every matching file under `root` that is not stored yet
    pub async fn index_directory(&self, root: &Path) -> Result<IndexReport, IndexError> {
        let started_at = Local::now();
        let start = Instant::now();
        info!("Starting indexing of directory: {}", root.display());

        let files = self.discovery.discover(root)?;
        info!("Found {} files", files.len());

        let mut claimed = self.store.list_ids(&self.collection).await;
        let progress = self.progress_bar(files.len() as u64);
        let mut outcomes = Vec::with_capacity(files.len());

        for path in &files {
            let id = models::document_id(path);
            if claimed.contains(&id) {
                debug!("Skipping already indexed file: {}", path.display());
                outcomes.push(FileOutcome::AlreadyIndexed {
                    path: path.clone(),
                    id,
                });
                progress.inc(1);
                continue;
            }

            progress.set_message(id.clone());
            match self.process(path, &id).await {
                Ok(()) => {
                    info!("Successfully indexed: {}", path.display());
                    claimed.insert(id.clone());
                    outcomes.push(FileOutcome::Indexed {
                        path: path.clone(),
                        id,
                    });
                }
                Err(error) => {
                    error!("Failed to index {}: {}", path.display(), error);
                    outcomes.push(FileOutcome::Failed {
                        path: path.clone(),
                        id,
                        error,
                    });
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        let duration = start.elapsed();
        info!("Indexing completed in {:.2} seconds", duration.as_secs_f64());
        info!("Total files processed: {}", files.len());

        Ok(IndexReport {
            root: root.to_path_buf(),
            started_at,
            duration,
            files_found: files.len(),
            outcomes,
        })
    }

    /// Run one file in its own task so a panic turns into a per-file failure
    async fn process(&self, path: &Path, id: &str) -> Result<(), IndexError> {
        let store = Arc::clone(&self.store);
        let extractors = Arc::clone(&self.extractors);
        let collection = self.collection.clone();
        let path = path.to_path_buf();
        let id = id.to_string();

        let task = tokio::spawn(async move {
            let file_type = extractors.resolve(&path)?;
            let text = extractors.extract(&path, file_type).await?;
            let metadata = models::document_metadata(&path, file_type);
            store.insert(&collection, &id, &text, metadata).await?;
            Ok::<(), IndexError>(())
        });

        match task.await {
            Ok(result) => result,
            Err(e) => Err(IndexError::Unexpected(format!("processing task failed: {}", e))),
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({msg})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }
}

/// Ids of every file the report marks as stored or already present
pub fn stored_ids(report: &IndexReport) -> HashSet<&str> {
    report
        .outcomes
        .iter()
        .filter(|o| !matches!(o, FileOutcome::Failed { .. }))
        .map(FileOutcome::id)
        .collect()
}
