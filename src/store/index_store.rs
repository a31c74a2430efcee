use crate::embeddings::EmbeddingProvider;
use crate::error::StoreError;
use crate::models::{CollectionHandle, DistanceMetric, Metadata, QueryHit};
use crate::store::{VectorRecord, VectorStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Thin layer over a vector store that embeds text on the way in and out
pub struct IndexStore {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IndexStore {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Reuse the named collection, or create it empty
    pub async fn get_or_create_collection(&self, name: &str) -> Result<CollectionHandle, StoreError> {
        if let Some(handle) = self.store.get_collection(name).await? {
            debug!("Reusing collection '{}'", name);
            return Ok(handle);
        }
        let handle = self.store.create_collection(name).await?;
        info!("Created collection '{}'", name);
        Ok(handle)
    }

    /// Ids already in the collection; empty on store failure
    pub async fn list_ids(&self, collection: &CollectionHandle) -> HashSet<String> {
        match self.store.ids(collection).await {
            Ok(ids) => ids,
            Err(e) => {
                error!("Error getting indexed files: {}", e);
                HashSet::new()
            }
        }
    }

    /// Embed `text` and store it under `id`
    pub async fn insert(
        &self,
        collection: &CollectionHandle,
        id: &str,
        text: &str,
        metadata: Metadata,
    ) -> Result<(), StoreError> {
        let embedding = self
            .embedder
            .compute_embedding(text)
            .await
            .map_err(|e| StoreError::Embedding(format!("{:#}", e)))?;

        self.store
            .add(
                collection,
                VectorRecord {
                    id: id.to_string(),
                    document: text.to_string(),
                    metadata,
                    embedding,
                },
            )
            .await
    }

    /// Nearest documents to `query_text`, ascending by distance; empty on failure
    pub async fn query(
        &self,
        collection: &CollectionHandle,
        query_text: &str,
        k: usize,
    ) -> Vec<QueryHit> {
        let embedding = match self.embedder.compute_embedding(query_text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                error!("Error embedding query: {:#}", e);
                return Vec::new();
            }
        };

        match self.store.query(collection, &embedding, k).await {
            Ok(hits) => hits,
            Err(e) => {
                error!("Error querying collection '{}': {}", collection.name(), e);
                Vec::new()
            }
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.store.metric()
    }

    /// Number of stored documents; 0 on store failure
    pub async fn count(&self, collection: &CollectionHandle) -> usize {
        match self.store.count(collection).await {
            Ok(count) => count,
            Err(e) => {
                error!("Error counting collection '{}': {}", collection.name(), e);
                0
            }
        }
    }

    pub fn embedder_name(&self) -> String {
        self.embedder.name()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::embeddings::HashEmbeddingProvider;
    use crate::store::LocalVectorStore;
    use tempfile::TempDir;

    /// Store whose every operation fails, except collection lookup
    pub(crate) struct FailingStore;

    #[async_trait::async_trait]
    impl VectorStore for FailingStore {
        fn metric(&self) -> DistanceMetric {
            DistanceMetric::Cosine
        }

        async fn get_collection(
            &self,
            name: &str,
        ) -> Result<Option<CollectionHandle>, StoreError> {
            Ok(Some(CollectionHandle::new(name)))
        }

        async fn create_collection(&self, name: &str) -> Result<CollectionHandle, StoreError> {
            Err(StoreError::AlreadyExists(name.to_string()))
        }

        async fn ids(&self, c: &CollectionHandle) -> Result<HashSet<String>, StoreError> {
            Err(StoreError::NotFound(c.name().to_string()))
        }

        async fn count(&self, c: &CollectionHandle) -> Result<usize, StoreError> {
            Err(StoreError::NotFound(c.name().to_string()))
        }

        async fn add(&self, c: &CollectionHandle, _r: VectorRecord) -> Result<(), StoreError> {
            Err(StoreError::NotFound(c.name().to_string()))
        }

        async fn query(
            &self,
            c: &CollectionHandle,
            _embedding: &[f32],
            _k: usize,
        ) -> Result<Vec<QueryHit>, StoreError> {
            Err(StoreError::NotFound(c.name().to_string()))
        }
    }

    struct FailingEmbedder;

    #[async_trait::async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn compute_embedding(&self, _content: &str) -> anyhow::Result<Vec<f32>> {
            anyhow::bail!("embedding server unavailable")
        }

        fn dimension(&self) -> usize {
            4
        }

        fn name(&self) -> String {
            "failing".to_string()
        }
    }

    fn local_index_store(tmp: &TempDir) -> IndexStore {
        IndexStore::new(
            Arc::new(LocalVectorStore::open(tmp.path()).unwrap()),
            Arc::new(HashEmbeddingProvider::new(384)),
        )
    }

    #[tokio::test]
    async fn test_get_or_create_collection_reuses() {
        let tmp = TempDir::new().unwrap();
        let store = local_index_store(&tmp);
        let first = store.get_or_create_collection("html_documents").await.unwrap();
        let second = store.get_or_create_collection("html_documents").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_get_or_create_collection_propagates_failure() {
        let tmp = TempDir::new().unwrap();
        let store = local_index_store(&tmp);
        assert!(store.get_or_create_collection("../escape").await.is_err());
    }

    #[tokio::test]
    async fn test_insert_then_list_and_query() {
        let tmp = TempDir::new().unwrap();
        let store = local_index_store(&tmp);
        let c = store.get_or_create_collection("docs").await.unwrap();

        store
            .insert(&c, "doc_a.html", "apples and pears", Metadata::new())
            .await
            .unwrap();
        store
            .insert(&c, "doc_b.html", "engines and gears", Metadata::new())
            .await
            .unwrap();

        let ids = store.list_ids(&c).await;
        assert!(ids.contains("doc_a.html") && ids.contains("doc_b.html"));
        assert_eq!(store.count(&c).await, 2);

        let hits = store.query(&c, "pears", 1).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "doc_a.html");
        assert_eq!(hits[0].document, "apples and pears");
    }

    #[tokio::test]
    async fn test_store_failures_fall_back_to_empty() {
        let store = IndexStore::new(
            Arc::new(FailingStore),
            Arc::new(HashEmbeddingProvider::new(8)),
        );
        let c = store.get_or_create_collection("docs").await.unwrap();

        assert!(store.list_ids(&c).await.is_empty());
        assert!(store.query(&c, "anything", 5).await.is_empty());
        assert_eq!(store.count(&c).await, 0);
        assert!(store.insert(&c, "doc_x", "text", Metadata::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_embedding_failure() {
        let tmp = TempDir::new().unwrap();
        let store = IndexStore::new(
            Arc::new(LocalVectorStore::open(tmp.path()).unwrap()),
            Arc::new(FailingEmbedder),
        );
        let c = store.get_or_create_collection("docs").await.unwrap();

        let err = store
            .insert(&c, "doc_x", "text", Metadata::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Embedding(msg) if msg.contains("unavailable")));
        assert!(store.query(&c, "text", 5).await.is_empty());
    }
}
