use thiserror::Error;

/// Errors surfaced by the indexing and question-answering pipeline.
///
/// Per-file ingestion failures (`UnsupportedFile`, `FileRead`) are collected
/// as warnings and never abort a batch; everything else propagates to the
/// command layer as a single descriptive message.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Error reading {path}: {reason}")]
    FileRead { path: String, reason: String },

    #[error("No valid content found in the uploaded files")]
    EmptyContent,

    #[error("Cannot build an index from an empty chunk sequence")]
    EmptyIndex,

    #[error("Index not found at {0}. Please process files first")]
    IndexNotFound(String),

    #[error("Stored index is unreadable: {0}")]
    IndexCorrupt(String),

    #[error("Index storage error: {0}")]
    Storage(String),

    #[error("Embedding request failed: {0}")]
    Embedding(String),

    #[error("Generation request failed: {0}")]
    Generation(String),

    #[error("API key not found. Please set GEMINI_API_KEY in the environment or .env file")]
    MissingCredential,
}
