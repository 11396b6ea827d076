use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use tabular_chat_agent::config::Config;
use tabular_chat_agent::error::AgentError;
use tabular_chat_agent::ingest;
use tabular_chat_agent::providers::traits::CompletionProvider;
use tabular_chat_agent::rag::{RagSystem, FALLBACK_ANSWER};
use tabular_chat_agent::store::VectorStore;

/// Deterministic stand-in for the Gemini service. Embeddings are letter
/// frequency histograms; completions answer about Alice when her row is in
/// the prompt context and fall back otherwise.
struct MockProvider;

fn letter_frequencies(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; 27];
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() {
            vector[(c as u8 - b'a') as usize] += 1.0;
        } else if c.is_ascii_digit() {
            vector[26] += 1.0;
        }
    }
    vector
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        // Keyed on the data row so a question mentioning Alice does not
        // count as context containing her
        if prompt.contains("Alice, 30") {
            Ok("Alice is 30 years old.".to_string())
        } else {
            Ok(FALLBACK_ANSWER.to_string())
        }
    }

    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        Ok(letter_frequencies(text))
    }
}

/// Embeds onto disjoint axes so retrieval scores are exactly 0 or 1, and
/// panics if generation is ever reached.
struct MismatchProvider;

#[async_trait]
impl CompletionProvider for MismatchProvider {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        panic!("an empty retrieval must never reach the generative call");
    }

    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        if text.to_lowercase().contains("sales") {
            Ok(vec![1.0, 0.0])
        } else {
            Ok(vec![0.0, 1.0])
        }
    }
}

fn test_config(index_dir: PathBuf) -> Config {
    Config {
        api_key: "test-key".to_string(),
        embed_model: "embedding-001".to_string(),
        chat_model: "gemini-pro".to_string(),
        temperature: 0.3,
        index_dir,
        max_chunk_size: 10_000,
        overlap_size: 1_000,
        top_k: 4,
        min_relevance: 0.0,
    }
}

fn rag_with(provider: Arc<dyn CompletionProvider>, index_dir: PathBuf) -> RagSystem {
    RagSystem::new(test_config(index_dir), provider)
}

#[tokio::test]
async fn full_pipeline_answers_from_a_csv_file() {
    let tmp = TempDir::new().unwrap();
    let csv = tmp.path().join("people.csv");
    fs::write(&csv, "Name,Age\nAlice,30\nBob,25\n").unwrap();

    let report = ingest::gather_text(&[csv]);
    assert!(report.warnings.is_empty());

    let rag = rag_with(Arc::new(MockProvider), tmp.path().join("index"));

    // The small file fits in a single chunk under the default sizes
    let count = rag.build_index(&report.text).await.unwrap();
    assert_eq!(count, 1);

    let answer = rag.answer_question("How old is Alice?").await.unwrap();
    assert!(answer.grounded);
    assert!(answer.text.contains("30"));
}

#[tokio::test]
async fn question_before_processing_reports_missing_index() {
    let tmp = TempDir::new().unwrap();
    let rag = rag_with(Arc::new(MockProvider), tmp.path().join("index"));

    let err = rag.answer_question("How old is Alice?").await.unwrap_err();
    assert!(matches!(err, AgentError::IndexNotFound(_)));
}

#[tokio::test]
async fn empty_source_text_is_rejected_and_previous_index_survives() {
    let tmp = TempDir::new().unwrap();
    let index_dir = tmp.path().join("index");
    let rag = rag_with(Arc::new(MockProvider), index_dir.clone());

    rag.build_index("Name, Age\nAlice, 30\n").await.unwrap();

    let err = rag.build_index("   \n\t ").await.unwrap_err();
    assert!(matches!(err, AgentError::EmptyContent));

    // The failed rebuild must leave the earlier snapshot intact
    let store = VectorStore::load(&index_dir).unwrap();
    assert_eq!(store.len(), 1);

    let answer = rag.answer_question("How old is Alice?").await.unwrap();
    assert!(answer.grounded);
}

#[tokio::test]
async fn rebuild_replaces_the_previous_index_wholesale() {
    let tmp = TempDir::new().unwrap();
    let index_dir = tmp.path().join("index");
    let rag = rag_with(Arc::new(MockProvider), index_dir.clone());

    rag.build_index("Name, Age\nAlice, 30\nBob, 25\n").await.unwrap();
    rag.build_index("Product, Price\nWidget, 9.99\n").await.unwrap();

    let store = VectorStore::load(&index_dir).unwrap();
    assert_eq!(store.len(), 1);

    let answer = rag.answer_question("How old is Alice?").await.unwrap();
    assert!(!answer.grounded);
    assert_eq!(answer.text, FALLBACK_ANSWER);
}

#[tokio::test]
async fn corrupt_snapshot_is_distinguished_from_missing() {
    let tmp = TempDir::new().unwrap();
    let index_dir = tmp.path().join("index");
    fs::create_dir_all(&index_dir).unwrap();
    fs::write(index_dir.join("index.json"), b"{ definitely not an index").unwrap();

    let rag = rag_with(Arc::new(MockProvider), index_dir);

    let err = rag.answer_question("How old is Alice?").await.unwrap_err();
    assert!(matches!(err, AgentError::IndexCorrupt(_)));
}

#[tokio::test]
async fn irrelevant_question_falls_back_without_generation() {
    let tmp = TempDir::new().unwrap();
    let index_dir = tmp.path().join("index");

    let mut config = test_config(index_dir);
    config.min_relevance = 0.5;
    let rag = RagSystem::new(config, Arc::new(MismatchProvider));

    rag.build_index("sales figures for the last quarter\n")
        .await
        .unwrap();

    // Orthogonal query embedding scores 0 against every stored chunk, so
    // retrieval comes back empty and MismatchProvider::complete never runs
    let answer = rag
        .answer_question("What is the capital of France?")
        .await
        .unwrap();

    assert!(!answer.grounded);
    assert_eq!(answer.text, FALLBACK_ANSWER);
}

#[tokio::test]
async fn mixed_batch_indexes_good_files_and_warns_on_the_rest() {
    let tmp = TempDir::new().unwrap();
    let good = tmp.path().join("people.csv");
    fs::write(&good, "Name,Age\nAlice,30\n").unwrap();

    let report = ingest::gather_text(&[
        good,
        tmp.path().join("slides.pptx"),
        tmp.path().join("gone.csv"),
    ]);

    assert_eq!(report.warnings.len(), 2);

    let rag = rag_with(Arc::new(MockProvider), tmp.path().join("index"));
    let count = rag.build_index(&report.text).await.unwrap();
    assert_eq!(count, 1);
}
