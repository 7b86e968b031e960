//! Embedding client trait.

use qna_core::AppResult;

/// Trait for embedding backends.
///
/// Model name and dimensionality are fixed configuration of the client,
/// not per-call parameters. Vectors are produced fresh per call and never
/// cached; failures propagate unchanged to the caller.
#[async_trait::async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Model identifier (e.g., "text-embedding-3-large").
    fn model_name(&self) -> &str;

    /// Fixed embedding dimensionality.
    fn dimensions(&self) -> usize;

    /// Generate the embedding vector for a single text.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;
}
