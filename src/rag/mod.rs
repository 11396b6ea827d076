mod retriever;
mod synthesizer;

pub use retriever::Retriever;
pub use synthesizer::{build_prompt, is_fallback, synthesize, Answer, FALLBACK_ANSWER};

use std::sync::Arc;

use crate::chunker::split_text;
use crate::config::Config;
use crate::error::AgentError;
use crate::providers::traits::CompletionProvider;
use crate::store::VectorStore;

/// The pipeline facade the user surface talks to: build an index from a
/// batch of flattened text, then answer questions against it.
pub struct RagSystem {
    config: Config,
    provider: Arc<dyn CompletionProvider>,
}

impl RagSystem {
    pub fn new(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Chunks the source text, embeds every chunk and persists the resulting
    /// index, replacing any previous one. Returns the number of chunks
    /// indexed.
    pub async fn build_index(&self, source_text: &str) -> Result<usize, AgentError> {
        if source_text.trim().is_empty() {
            return Err(AgentError::EmptyContent);
        }

        let chunks = split_text(
            source_text,
            self.config.max_chunk_size,
            self.config.overlap_size,
        );
        if chunks.is_empty() {
            return Err(AgentError::EmptyContent);
        }

        log::info!("embedding {} chunks", chunks.len());

        // Sequential on purpose: the stored order must match chunk order
        let mut vectors = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let vector = self
                .provider
                .generate_embedding(&chunk.content)
                .await
                .map_err(|e| AgentError::Embedding(e.to_string()))?;
            vectors.push(vector);
        }

        let store = VectorStore::build(chunks, vectors)?;
        store.save(&self.config.index_dir)?;

        Ok(store.len())
    }

    /// Loads the persisted index, retrieves the most relevant chunks and
    /// synthesizes a grounded answer. An empty retrieval returns the
    /// fallback answer without ever calling the generative model.
    pub async fn answer_question(&self, question: &str) -> Result<Answer, AgentError> {
        let store = VectorStore::load(&self.config.index_dir)?;

        let retriever = Retriever::new(self.config.top_k, self.config.min_relevance);
        let hits = retriever
            .retrieve(question, self.provider.as_ref(), &store)
            .await?;

        if hits.is_empty() {
            log::info!("no relevant chunks found, returning fallback answer");
            return Ok(Answer::fallback());
        }

        synthesize(&hits, question, self.provider.as_ref()).await
    }
}
