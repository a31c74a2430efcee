//! File-backed vector store.
//!
//! Every collection lives in `<persist_dir>/<name>.jsonl`, one [`VectorRecord`]
//! per line. Records are appended on insert and the whole file is read back
//! the first time a collection is touched, so a collection survives process
//! restarts. Search is brute-force cosine distance.

use crate::error::StoreError;
use crate::models::{CollectionHandle, DistanceMetric, QueryHit};
use crate::store::{VectorRecord, VectorStore};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;

const COLLECTION_EXTENSION: &str = "jsonl";

#[derive(Default)]
struct Collection {
    records: Vec<VectorRecord>,
    ids: HashSet<String>,
}

impl Collection {
    fn dimension(&self) -> Option<usize> {
        self.records.first().map(|r| r.embedding.len())
    }
}

/// Persistent vector store backed by JSON lines files
pub struct LocalVectorStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, Collection>>,
}

impl LocalVectorStore {
    /// Open (and create if needed) a store rooted at `persist_dir`
    pub fn open(persist_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = persist_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        debug!("LocalVectorStore opened at {}", root.display());
        Ok(Self {
            root,
            collections: RwLock::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn validate_name(name: &str) -> Result<(), StoreError> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
        if valid {
            Ok(())
        } else {
            Err(StoreError::InvalidName(name.to_string()))
        }
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, COLLECTION_EXTENSION))
    }

    async fn read_collection(&self, name: &str) -> Result<Option<Collection>, StoreError> {
        let path = self.collection_path(name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut collection = Collection::default();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: VectorRecord =
                serde_json::from_str(line).map_err(|e| StoreError::Corrupt {
                    collection: name.to_string(),
                    line: index + 1,
                    message: e.to_string(),
                })?;
            collection.ids.insert(record.id.clone());
            collection.records.push(record);
        }

        debug!(
            "Loaded collection '{}' with {} records",
            name,
            collection.records.len()
        );
        Ok(Some(collection))
    }

    /// Make sure `name` is in memory; returns false when it does not exist
    async fn ensure_loaded(&self, name: &str) -> Result<bool, StoreError> {
        if self.collections.read().await.contains_key(name) {
            return Ok(true);
        }

        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Ok(true);
        }
        match self.read_collection(name).await? {
            Some(collection) => {
                collections.insert(name.to_string(), collection);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn require(&self, collection: &CollectionHandle) -> Result<(), StoreError> {
        if self.ensure_loaded(collection.name()).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound(collection.name().to_string()))
        }
    }

    fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 1.0;
        }

        1.0 - dot / (norm_a * norm_b)
    }
}

#[async_trait::async_trait]
impl VectorStore for LocalVectorStore {
    fn metric(&self) -> DistanceMetric {
        DistanceMetric::Cosine
    }

    async fn get_collection(&self, name: &str) -> Result<Option<CollectionHandle>, StoreError> {
        Self::validate_name(name)?;
        if self.ensure_loaded(name).await? {
            Ok(Some(CollectionHandle::new(name)))
        } else {
            Ok(None)
        }
    }

    async fn create_collection(&self, name: &str) -> Result<CollectionHandle, StoreError> {
        Self::validate_name(name)?;
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }

        let result = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.collection_path(name))
            .await;
        match result {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        collections.insert(name.to_string(), Collection::default());
        debug!("Created collection '{}'", name);
        Ok(CollectionHandle::new(name))
    }

    async fn ids(&self, collection: &CollectionHandle) -> Result<HashSet<String>, StoreError> {
        self.require(collection).await?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection.name())
            .map(|c| c.ids.clone())
            .unwrap_or_default())
    }

    async fn count(&self, collection: &CollectionHandle) -> Result<usize, StoreError> {
        self.require(collection).await?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection.name())
            .map(|c| c.records.len())
            .unwrap_or_default())
    }

    async fn add(
        &self,
        collection: &CollectionHandle,
        record: VectorRecord,
    ) -> Result<(), StoreError> {
        self.require(collection).await?;
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(collection.name())
            .ok_or_else(|| StoreError::NotFound(collection.name().to_string()))?;

        if entry.ids.contains(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        if let Some(expected) = entry.dimension() {
            if record.embedding.len() != expected {
                return Err(StoreError::DimensionMismatch {
                    got: record.embedding.len(),
                    expected,
                });
            }
        }

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.collection_path(collection.name()))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!("Added '{}' to collection '{}'", record.id, collection.name());
        entry.ids.insert(record.id.clone());
        entry.records.push(record);
        Ok(())
    }

    async fn query(
        &self,
        collection: &CollectionHandle,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<QueryHit>, StoreError> {
        self.require(collection).await?;
        let collections = self.collections.read().await;
        let Some(entry) = collections.get(collection.name()) else {
            return Err(StoreError::NotFound(collection.name().to_string()));
        };

        if let Some(expected) = entry.dimension() {
            if embedding.len() != expected {
                return Err(StoreError::DimensionMismatch {
                    got: embedding.len(),
                    expected,
                });
            }
        }

        let mut scored: Vec<(f32, &VectorRecord)> = entry
            .records
            .iter()
            .map(|record| (Self::cosine_distance(embedding, &record.embedding), record))
            .collect();

        // stable: equal distances keep insertion order
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(distance, record)| QueryHit {
                id: record.id.clone(),
                document: record.document.clone(),
                metadata: record.metadata.clone(),
                distance,
            })
            .collect())
    }
}
