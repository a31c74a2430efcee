use crate::config::Config;
use crate::embeddings::{self, EmbeddingProvider};
use crate::indexer::DocumentIndexer;
use crate::query::QueryEngine;
use crate::store::{IndexStore, LocalVectorStore, VectorStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Everything one process needs, built once and passed around explicitly
pub struct AppContext {
    pub config: Config,
    pub store: Arc<IndexStore>,
    pub indexer: DocumentIndexer,
    pub query: QueryEngine,
}

impl AppContext {
    /// Build the embedding provider and open the local store from `config`
    pub async fn from_config(config: Config) -> Result<Self> {
        let embedder = embeddings::from_config(&config)?;
        let store = LocalVectorStore::open(&config.index.persist_dir).with_context(|| {
            format!(
                "Failed to open vector store at {}",
                config.index.persist_dir.display()
            )
        })?;
        Self::with_components(config, Arc::new(store), embedder).await
    }

    /// Wire the pipeline around an existing store and embedder
    pub async fn with_components(
        config: Config,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        info!(
            "Using embedding provider {} ({} dimensions)",
            embedder.name(),
            embedder.dimension()
        );
        let index_store = Arc::new(IndexStore::new(store, embedder));

        let indexer = DocumentIndexer::new(
            Arc::clone(&index_store),
            &config.index.collection_name,
            &config.index.extensions,
        )
        .await
        .with_context(|| {
            format!(
                "Failed to initialize collection '{}'",
                config.index.collection_name
            )
        })?;

        let query = QueryEngine::new(Arc::clone(&index_store), indexer.collection().clone());

        Ok(Self {
            config,
            store: index_store,
            indexer,
            query,
        })
    }
}
