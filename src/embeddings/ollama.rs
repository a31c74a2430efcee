use crate::embeddings::EmbeddingProvider;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_OLLAMA_MODEL: &str = "nomic-embed-text";

/// Embedding provider using a local Ollama server
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimension: AtomicUsize, // updated at runtime if the model disagrees
}

impl OllamaEmbeddingProvider {
    /// Determine embedding dimension from model name
    pub(crate) fn get_dimension_for_model(model: &str) -> usize {
        match model {
            m if m.contains("mxbai-embed") => 1024,
            m if m.contains("nomic-embed") => 768,
            m if m.contains("bge-small") || m.contains("all-minilm") => 384,
            m if m.contains("bge-base") => 768,
            // validated against the first real response
            _ => 768,
        }
    }

    /// Create a new Ollama provider.
    /// Uses the provided dimension, or infers it from the model name.
    pub fn new(base_url: Option<&str>, model: Option<&str>, dimension: Option<usize>) -> Self {
        let model = model.unwrap_or(DEFAULT_OLLAMA_MODEL).to_string();
        let dimension = dimension.unwrap_or_else(|| Self::get_dimension_for_model(&model));

        Self {
            client: reqwest::Client::new(),
            base_url: base_url
                .unwrap_or(DEFAULT_OLLAMA_URL)
                .trim_end_matches('/')
                .to_string(),
            model,
            dimension: AtomicUsize::new(dimension),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct OllamaEmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn compute_embedding(&self, content: &str) -> Result<Vec<f32>> {
        let content = content.trim();
        if content.is_empty() {
            anyhow::bail!("Cannot generate embedding for empty content");
        }

        let url = format!("{}/api/embeddings", self.base_url);
        let request = OllamaEmbeddingRequest {
            model: self.model.clone(),
            prompt: content.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to Ollama")?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama API returned error: {}", response.status());
        }

        let embedding_response: OllamaEmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse Ollama embedding response")?;

        if embedding_response.embedding.is_empty() {
            anyhow::bail!("Ollama returned empty embedding (dimension 0)");
        }

        let actual_dimension = embedding_response.embedding.len();
        let expected_dimension = self.dimension.load(Ordering::Relaxed);
        if actual_dimension != expected_dimension {
            info!(
                "Model '{}' returned embedding dimension {} (expected {}), adopting it",
                self.model, actual_dimension, expected_dimension
            );
            self.dimension.store(actual_dimension, Ordering::Relaxed);
        }

        Ok(embedding_response.embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension.load(Ordering::Relaxed)
    }

    fn name(&self) -> String {
        format!("ollama:{}", self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaEmbeddingProvider::new(None, None, None);
        assert_eq!(provider.base_url, "http://127.0.0.1:11434");
        assert_eq!(provider.model, "nomic-embed-text");
        assert_eq!(provider.dimension(), 768);
        assert_eq!(provider.name(), "ollama:nomic-embed-text");
    }

    #[test]
    fn test_ollama_provider_with_explicit_dims() {
        let provider = OllamaEmbeddingProvider::new(None, Some("custom-model"), Some(1024));
        assert_eq!(provider.model, "custom-model");
        assert_eq!(provider.dimension(), 1024);
    }

    #[test]
    fn test_get_dimension_for_model() {
        assert_eq!(OllamaEmbeddingProvider::get_dimension_for_model("mxbai-embed-large"), 1024);
        assert_eq!(OllamaEmbeddingProvider::get_dimension_for_model("nomic-embed-text"), 768);
        assert_eq!(OllamaEmbeddingProvider::get_dimension_for_model("bge-small-en-v1.5"), 384);
        assert_eq!(OllamaEmbeddingProvider::get_dimension_for_model("unknown-model"), 768);
    }

    #[test]
    fn test_ollama_provider_trims_trailing_slash() {
        let provider = OllamaEmbeddingProvider::new(Some("http://localhost:8080/"), None, None);
        assert_eq!(provider.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_ollama_rejects_empty_content() {
        let provider = OllamaEmbeddingProvider::new(None, None, None);
        assert!(provider.compute_embedding("   ").await.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires Ollama server running
    async fn test_ollama_provider_compute() {
        let provider = OllamaEmbeddingProvider::new(None, None, None);
        let embedding = provider.compute_embedding("test content").await.unwrap();
        assert_eq!(embedding.len(), 768);
        assert!(!embedding.iter().all(|&x| x == 0.0));
    }
}
