//! Collaborator boundaries for embedding and text generation.
//!
//! Both models are opaque services reachable over the network. The pipelines
//! only see these two traits; the concrete [`ollama`] implementations talk
//! to an Ollama server, and the [`mock`] implementations make tests
//! deterministic and offline.

use async_trait::async_trait;

use crate::types::RagError;

pub mod mock;
pub mod ollama;

pub use mock::{MockEmbeddingProvider, ScriptedGenerator};
pub use ollama::{OllamaEmbeddings, OllamaGenerator};

/// Maps text to a fixed-length embedding vector.
///
/// Invoked once per chunk during indexing and once per question during
/// query. The output dimension is fixed per model configuration; the index
/// enforces consistency and surfaces drift as a hard error.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;
}

/// Produces a text completion for an assembled prompt.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, RagError>;
}
