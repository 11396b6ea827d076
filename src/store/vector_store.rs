use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunker::TextChunk;
use crate::error::AgentError;

const SNAPSHOT_FILE: &str = "index.json";
const SNAPSHOT_TMP: &str = "index.json.tmp";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    chunk: TextChunk,
    vector: Vec<f32>,
}

/// A chunk returned from a similarity search, ranked by descending score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: TextChunk,
    pub score: f32,
}

/// Durable collection of (chunk, vector) pairs for one ingestion batch.
///
/// Brute-force cosine search over a serde_json snapshot; each build replaces
/// the previous snapshot wholesale. Suitable for the small indexes this
/// pipeline produces, not a general-purpose vector database.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorStore {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl VectorStore {
    /// Pairs chunks with their embedding vectors, in chunk order.
    ///
    /// Fails with `EmptyIndex` for an empty chunk sequence and with
    /// `Embedding` when the gateway produced a mismatched vector set.
    pub fn build(chunks: Vec<TextChunk>, vectors: Vec<Vec<f32>>) -> Result<Self, AgentError> {
        if chunks.is_empty() {
            return Err(AgentError::EmptyIndex);
        }
        if chunks.len() != vectors.len() {
            return Err(AgentError::Embedding(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimension = vectors[0].len();
        if dimension == 0 {
            return Err(AgentError::Embedding("embedding dimension is zero".to_string()));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(AgentError::Embedding(format!(
                "inconsistent embedding dimensions: {} vs {}",
                dimension,
                bad.len()
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexEntry { chunk, vector })
            .collect();

        Ok(Self { dimension, entries })
    }

    /// Persists the snapshot under `dir`, atomically replacing any previous
    /// index: the new snapshot is written to a temp file first, so a failed
    /// build never clobbers the index already on disk.
    pub fn save(&self, dir: &Path) -> Result<(), AgentError> {
        fs::create_dir_all(dir).map_err(|e| AgentError::Storage(e.to_string()))?;

        let bytes =
            serde_json::to_vec(self).map_err(|e| AgentError::Storage(e.to_string()))?;

        let tmp = dir.join(SNAPSHOT_TMP);
        fs::write(&tmp, bytes).map_err(|e| AgentError::Storage(e.to_string()))?;
        fs::rename(&tmp, dir.join(SNAPSHOT_FILE))
            .map_err(|e| AgentError::Storage(e.to_string()))?;

        log::info!("persisted {} chunks to {}", self.entries.len(), dir.display());
        Ok(())
    }

    /// Reconstructs an index from durable storage.
    ///
    /// `IndexNotFound` when no index was ever built at `dir`; `IndexCorrupt`
    /// when the snapshot exists but cannot be trusted.
    pub fn load(dir: &Path) -> Result<Self, AgentError> {
        let path = dir.join(SNAPSHOT_FILE);
        if !path.exists() {
            return Err(AgentError::IndexNotFound(dir.display().to_string()));
        }

        let bytes = fs::read(&path).map_err(|e| AgentError::IndexCorrupt(e.to_string()))?;
        let store: VectorStore = serde_json::from_slice(&bytes)
            .map_err(|e| AgentError::IndexCorrupt(e.to_string()))?;

        if store.entries.is_empty() {
            return Err(AgentError::IndexCorrupt("snapshot holds no entries".to_string()));
        }
        if store
            .entries
            .iter()
            .any(|entry| entry.vector.len() != store.dimension)
        {
            return Err(AgentError::IndexCorrupt(
                "stored vectors disagree with recorded dimension".to_string(),
            ));
        }

        Ok(store)
    }

    /// Returns up to `k` chunks ranked by descending cosine similarity.
    ///
    /// Never errors on a well-formed index: fewer stored vectors than `k`
    /// returns all of them, and a query of the wrong dimension returns
    /// nothing.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        if query.len() != self.dimension {
            log::warn!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            );
            return Vec::new();
        }

        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query, &entry.vector),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(k);
        results
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity in [-1, 1]; zero vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
