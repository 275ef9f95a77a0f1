//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. A single call makes a single attempt; retry policy, if any,
/// belongs to the caller.
///
/// # Example
///
/// ```rust,ignore
/// use rag_store::EmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new(config)?;
/// let embedding = provider.embed("hello world").await?;
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
