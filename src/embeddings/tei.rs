use crate::embeddings::EmbeddingProvider;
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

const DEFAULT_TEI_URL: &str = "http://127.0.0.1:8080";

/// Text Embeddings Inference (TEI) provider from Hugging Face.
/// Defaults match `BAAI/bge-small-en-v1.5` (384 dimensions).
pub struct TeiEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    dimension: AtomicUsize, // updated at runtime if the server disagrees
}

impl TeiEmbeddingProvider {
    /// Create a new TEI embedding provider
    pub fn new(base_url: Option<&str>, model: &str, dimension: Option<usize>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url
                .unwrap_or(DEFAULT_TEI_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.to_string(),
            api_key: None,
            dimension: AtomicUsize::new(dimension.unwrap_or(384)),
        }
    }

    /// Send a bearer token with every request
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

#[derive(Serialize)]
struct TeiEmbeddingRequest<'a> {
    inputs: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    truncate: Option<bool>,
}

// TEI answers `/embed` with a bare array of vectors, one per input
type TeiEmbeddingResponse = Vec<Vec<f32>>;

#[async_trait::async_trait]
impl EmbeddingProvider for TeiEmbeddingProvider {
    async fn compute_embedding(&self, content: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.compute_embeddings(&[content.to_string()]).await?;
        embeddings
            .pop()
            .context("TEI returned no embedding for the input")
    }

    async fn compute_embeddings(&self, contents: &[String]) -> Result<Vec<Vec<f32>>> {
        if contents.is_empty() {
            return Ok(Vec::new());
        }
        if contents.iter().any(|c| c.trim().is_empty()) {
            anyhow::bail!("Cannot generate embedding for empty content");
        }

        let url = format!("{}/embed", self.base_url);
        let request = TeiEmbeddingRequest {
            inputs: contents,
            truncate: Some(true),
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to connect to TEI server")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("TEI API returned error {}: {}", status, error_text);
        }

        let embeddings: TeiEmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse TEI embedding response")?;

        if embeddings.len() != contents.len() {
            anyhow::bail!(
                "TEI returned {} embeddings for {} inputs",
                embeddings.len(),
                contents.len()
            );
        }

        let actual_dimension = embeddings.first().map(Vec::len).unwrap_or_default();
        if actual_dimension == 0 {
            anyhow::bail!("TEI returned empty embedding (dimension 0)");
        }

        let expected_dimension = self.dimension.load(Ordering::Relaxed);
        if actual_dimension != expected_dimension {
            info!(
                "TEI model returned embedding dimension {} (expected {}), adopting it",
                actual_dimension, expected_dimension
            );
            self.dimension.store(actual_dimension, Ordering::Relaxed);
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension.load(Ordering::Relaxed)
    }

    fn name(&self) -> String {
        format!("tei:{}", self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tei_embedding_provider_creation() {
        let provider = TeiEmbeddingProvider::new(None, "BAAI/bge-small-en-v1.5", None);
        assert_eq!(provider.base_url, "http://127.0.0.1:8080");
        assert_eq!(provider.dimension(), 384);
        assert_eq!(provider.name(), "tei:BAAI/bge-small-en-v1.5");
        assert!(provider.api_key.is_none());
    }

    #[test]
    fn test_tei_embedding_provider_with_explicit_dims() {
        let provider = TeiEmbeddingProvider::new(None, "m", Some(1024));
        assert_eq!(provider.dimension(), 1024);
    }

    #[test]
    fn test_tei_embedding_provider_custom_url_and_key() {
        let provider = TeiEmbeddingProvider::new(Some("http://localhost:8081/"), "m", None)
            .with_api_key(Some("secret".to_string()));
        assert_eq!(provider.base_url, "http://localhost:8081");
        assert_eq!(provider.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_tei_request_shape() {
        let inputs = vec!["a".to_string(), "b".to_string()];
        let request = TeiEmbeddingRequest {
            inputs: &inputs,
            truncate: Some(true),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"inputs": ["a", "b"], "truncate": true}));
    }

    #[tokio::test]
    async fn test_tei_empty_batch_needs_no_server() {
        let provider = TeiEmbeddingProvider::new(Some("http://127.0.0.1:9"), "m", None);
        let embeddings = provider.compute_embeddings(&[]).await.unwrap();
        assert!(embeddings.is_empty());
    }

    #[tokio::test]
    async fn test_tei_rejects_empty_content() {
        let provider = TeiEmbeddingProvider::new(Some("http://127.0.0.1:9"), "m", None);
        assert!(provider.compute_embedding("  ").await.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires TEI server running
    async fn test_tei_embedding_provider_compute() {
        let provider = TeiEmbeddingProvider::new(None, "BAAI/bge-small-en-v1.5", None);
        let embedding = provider.compute_embedding("test content").await.unwrap();
        assert_eq!(embedding.len(), 384);
        assert!(!embedding.iter().all(|&x| x == 0.0));
    }
}
