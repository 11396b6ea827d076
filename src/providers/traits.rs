use anyhow::Result;
use async_trait::async_trait;

/// Narrow interface over the external model service.
///
/// The same provider instance must be used when building the index and when
/// answering questions; mixing embedding models silently degrades retrieval
/// relevance with no error signal.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Completes a prompt with the generative model.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Maps text to a fixed-dimension embedding vector.
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>>;
}
