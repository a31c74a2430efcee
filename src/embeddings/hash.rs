use crate::embeddings::EmbeddingProvider;
use anyhow::Result;

/// Deterministic offline embedder.
///
/// Each lowercased token is hashed with blake3 into one of `dims` buckets with
/// a hash-derived sign, then the vector is L2-normalized. Texts sharing words
/// land close together, which is enough for local runs and tests without an
/// embedding server.
pub struct HashEmbeddingProvider {
    dims: usize,
}

impl HashEmbeddingProvider {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let hash = blake3::hash(token.as_bytes());
        let bytes = hash.as_bytes();
        let mut index = [0u8; 8];
        index.copy_from_slice(&bytes[..8]);
        let bucket = (u64::from_le_bytes(index) % self.dims as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn compute_embedding(&self, content: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dims];

        for token in content
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let (bucket, sign) = self.bucket(&token.to_lowercase());
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dims
    }

    fn name(&self) -> String {
        format!("hash:{}", self.dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_hash_embedding_is_deterministic_and_normalized() {
        let provider = HashEmbeddingProvider::new(64);
        let a = provider.compute_embedding("Hello world").await.unwrap();
        let b = provider.compute_embedding("hello WORLD").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_hash_embedding_empty_text_is_zero_vector() {
        let provider = HashEmbeddingProvider::new(16);
        let v = provider.compute_embedding("  ,, ").await.unwrap();
        assert_eq!(v, vec![0.0; 16]);
    }

    #[tokio::test]
    async fn test_hash_embedding_shared_words_are_closer() {
        let provider = HashEmbeddingProvider::new(384);
        let query = provider.compute_embedding("quarterly revenue").await.unwrap();
        let near = provider
            .compute_embedding("the quarterly revenue report")
            .await
            .unwrap();
        let far = provider
            .compute_embedding("a recipe for apple pie")
            .await
            .unwrap();
        assert!(dot(&query, &near) > dot(&query, &far));
    }

    #[tokio::test]
    async fn test_hash_embedding_batch_matches_single() {
        let provider = HashEmbeddingProvider::new(32);
        let inputs = vec!["one".to_string(), "two".to_string()];
        let batch = provider.compute_embeddings(&inputs).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], provider.compute_embedding("two").await.unwrap());
        assert_eq!(provider.name(), "hash:32");
    }
}
