use std::env;
use std::path::PathBuf;

use crate::error::AgentError;

/// Runtime configuration for the whole pipeline.
///
/// Built once at process startup and passed explicitly into the components
/// that need it; no module reads the credential from ambient state.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub embed_model: String,
    pub chat_model: String,
    pub temperature: f32,
    pub index_dir: PathBuf,
    pub max_chunk_size: usize,
    pub overlap_size: usize,
    pub top_k: usize,
    pub min_relevance: f32,
}

impl Config {
    /// Loads configuration from the environment. A missing API key is a
    /// startup-time fatal condition, not a per-request one.
    pub fn from_env() -> Result<Self, AgentError> {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .map_err(|_| AgentError::MissingCredential)?;

        Ok(Self::with_api_key(api_key))
    }

    /// Builds a configuration around an explicitly supplied API key, reading
    /// everything else from the environment or falling back to defaults.
    pub fn with_api_key(api_key: String) -> Self {
        let embed_model = env::var("GEMINI_EMBED_MODEL")
            .unwrap_or_else(|_| "embedding-001".to_string());

        let chat_model = env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| "gemini-pro".to_string());

        let temperature = env::var("GEMINI_TEMPERATURE")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.3);

        let index_dir = env::var("INDEX_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/table_index"));

        let max_chunk_size: usize = env::var("CHUNK_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        let overlap_size: usize = env::var("CHUNK_OVERLAP")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1_000);

        let top_k = env::var("RETRIEVAL_TOP_K")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(4);

        let min_relevance = env::var("MIN_RELEVANCE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0);

        Self {
            api_key,
            embed_model,
            chat_model,
            temperature,
            index_dir,
            // The chunker requires overlap < chunk size
            max_chunk_size: max_chunk_size.max(1),
            overlap_size: overlap_size.min(max_chunk_size.saturating_sub(1)),
            top_k,
            min_relevance,
        }
    }
}
