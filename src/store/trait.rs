use crate::error::StoreError;
use crate::models::{CollectionHandle, DistanceMetric, Metadata, QueryHit};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One stored document with its vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub document: String,
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

/// Trait for vector stores holding named collections of embedded documents
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Distance metric reported in query results
    fn metric(&self) -> DistanceMetric;

    /// Look up an existing collection
    async fn get_collection(&self, name: &str) -> Result<Option<CollectionHandle>, StoreError>;

    /// Create an empty collection; fails if it already exists
    async fn create_collection(&self, name: &str) -> Result<CollectionHandle, StoreError>;

    /// All document ids in a collection
    async fn ids(&self, collection: &CollectionHandle) -> Result<HashSet<String>, StoreError>;

    /// Number of documents in a collection
    async fn count(&self, collection: &CollectionHandle) -> Result<usize, StoreError>;

    /// Add one record; the id must not be present yet
    async fn add(&self, collection: &CollectionHandle, record: VectorRecord)
        -> Result<(), StoreError>;

    /// The `k` nearest records to `embedding`, ascending by distance
    async fn query(
        &self,
        collection: &CollectionHandle,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<QueryHit>, StoreError>;
}
