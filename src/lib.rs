pub mod chunker;
pub mod commands;
pub mod config;
pub mod error;
pub mod ingest;
pub mod providers;
pub mod rag;
pub mod store;

// Re-export commonly used items
pub use config::Config;
pub use error::AgentError;
pub use rag::{Answer, RagSystem, FALLBACK_ANSWER};
pub use store::VectorStore;
