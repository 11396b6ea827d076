use crate::error::AgentError;
use crate::providers::traits::CompletionProvider;
use crate::store::{ScoredChunk, VectorStore};

/// Embeds a question and pulls the most similar chunks out of the store.
pub struct Retriever {
    top_k: usize,
    min_relevance: f32,
}

impl Retriever {
    pub fn new(top_k: usize, min_relevance: f32) -> Self {
        Self { top_k, min_relevance }
    }

    /// Returns up to `top_k` chunks ranked by similarity, dropping anything
    /// below the relevance floor. An empty result means "no relevant
    /// information" and the caller must not proceed to generation with it.
    pub async fn retrieve(
        &self,
        question: &str,
        provider: &dyn CompletionProvider,
        store: &VectorStore,
    ) -> Result<Vec<ScoredChunk>, AgentError> {
        let query = provider
            .generate_embedding(question)
            .await
            .map_err(|e| AgentError::Embedding(e.to_string()))?;

        let mut hits = store.search(&query, self.top_k);
        hits.retain(|hit| hit.score >= self.min_relevance);

        log::info!("retrieved {} chunks for question", hits.len());
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::TextChunk;
    use anyhow::Result;
    use async_trait::async_trait;

    /// Deterministic stand-in for the embedding gateway: a text maps to a
    /// fixed axis depending on a keyword.
    struct KeywordProvider;

    #[async_trait]
    impl CompletionProvider for KeywordProvider {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            unreachable!("retrieval never calls the generative model")
        }

        async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("age") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0])
            }
        }
    }

    fn make_chunk(index: usize, content: &str) -> TextChunk {
        TextChunk {
            index,
            content: content.to_string(),
            start_offset: 0,
            end_offset: content.len(),
        }
    }

    #[tokio::test]
    async fn test_retrieve_ranks_and_limits() {
        let store = VectorStore::build(
            vec![
                make_chunk(0, "Alice,30"),
                make_chunk(1, "sales figures"),
            ],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();

        let retriever = Retriever::new(1, 0.0);
        let hits = retriever
            .retrieve("what age", &KeywordProvider, &store)
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.index, 0);
    }

    #[tokio::test]
    async fn test_retrieve_filters_below_relevance_floor() {
        let store = VectorStore::build(
            vec![make_chunk(0, "sales figures")],
            vec![vec![0.0, 1.0]],
        )
        .unwrap();

        // The only stored chunk is orthogonal to the query embedding
        let retriever = Retriever::new(4, 0.5);
        let hits = retriever
            .retrieve("what age", &KeywordProvider, &store)
            .await
            .unwrap();

        assert!(hits.is_empty());
    }
}
