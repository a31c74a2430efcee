pub mod hash;
pub mod ollama;
pub mod r#trait;
pub mod tei;

pub use hash::HashEmbeddingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use r#trait::EmbeddingProvider;
pub use tei::TeiEmbeddingProvider;

use crate::config::Config;
use anyhow::Result;
use std::sync::Arc;

/// Build the embedding provider named in `[embedding]`
pub fn from_config(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedding = &config.embedding;
    let provider: Arc<dyn EmbeddingProvider> = match embedding.provider.as_str() {
        "tei" => Arc::new(
            TeiEmbeddingProvider::new(
                embedding.url.as_deref(),
                &embedding.model,
                Some(embedding.dims),
            )
            .with_api_key(config.embedding_api_key()),
        ),
        "ollama" => Arc::new(OllamaEmbeddingProvider::new(
            embedding.url.as_deref(),
            Some(&embedding.model),
            Some(embedding.dims),
        )),
        "hash" => Arc::new(HashEmbeddingProvider::new(embedding.dims)),
        other => anyhow::bail!(
            "Unknown embedding provider '{}' (expected tei, ollama or hash)",
            other
        ),
    };
    Ok(provider)
}
