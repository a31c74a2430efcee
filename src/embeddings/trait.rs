use anyhow::Result;

/// Trait for embedding providers that can compute semantic vectors from text
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Compute embedding vector from text content
    async fn compute_embedding(&self, content: &str) -> Result<Vec<f32>>;

    /// Compute embeddings for a batch of texts, one vector per input, in order
    async fn compute_embeddings(&self, contents: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(contents.len());
        for content in contents {
            embeddings.push(self.compute_embedding(content).await?);
        }
        Ok(embeddings)
    }

    /// Get the dimension of embeddings produced by this provider
    fn dimension(&self) -> usize;

    /// Short identifier used in logs (e.g. `tei:BAAI/bge-small-en-v1.5`)
    fn name(&self) -> String;
}
