use crate::models::{CollectionHandle, SearchResult, CONTENT_PREVIEW_CHARS};
use crate::store::IndexStore;
use crate::utils;
use std::sync::Arc;
use tracing::debug;

/// Number of results returned when the caller does not ask for a count
pub const DEFAULT_LIMIT: usize = 5;

/// Answers natural-language queries against one collection
pub struct QueryEngine {
    store: Arc<IndexStore>,
    collection: CollectionHandle,
}

impl QueryEngine {
    pub fn new(store: Arc<IndexStore>, collection: CollectionHandle) -> Self {
        Self { store, collection }
    }

    /// Top `k` documents for `query`, best score first.
    ///
    /// Scores come from the store's declared metric, so they stay
    /// comparable whatever distance the store reports.
    pub async fn search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        if k == 0 {
            return Vec::new();
        }

        let metric = self.store.metric();
        let hits = self.store.query(&self.collection, query, k).await;
        debug!("Query {:?} returned {} hits ({})", query, hits.len(), metric);

        let mut results: Vec<SearchResult> = hits
            .into_iter()
            .map(|hit| SearchResult {
                source: hit.metadata.get("source").cloned().unwrap_or_default(),
                content: utils::truncate_chars(&hit.document, CONTENT_PREVIEW_CHARS).to_string(),
                metadata: hit.metadata,
                score: metric.score(hit.distance),
            })
            .collect();

        // stable, so equal scores keep the store's order
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results
    }

    pub fn collection(&self) -> &CollectionHandle {
        &self.collection
    }
}
