//! Core data types shared across the ingestion and answer pipelines.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A contiguous, possibly overlapping substring of a source document, sized
/// for embedding.
///
/// Chunks are immutable once created. The ordinal preserves document order;
/// it is not used for ranking but kept for traceability back to the source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text, including any overlap copied from the previous chunk.
    pub text: String,
    /// Zero-based position of this chunk within its source document.
    pub ordinal: usize,
    /// Identifier of the document this chunk was cut from.
    pub source_id: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(text: impl Into<String>, ordinal: usize, source_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ordinal,
            source_id: source_id.into(),
        }
    }
}

/// A chunk paired with its embedding vector.
///
/// Created during indexing, never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

impl EmbeddedChunk {
    /// Dimension of the embedding vector.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// A chunk returned from similarity search together with its score.
///
/// Scores are cosine similarities in `[-1, 1]`; higher is more similar.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// A natural-language question, one per request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A generated answer, derived per question and never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
}

/// Errors produced by the RAG pipelines and their collaborators.
///
/// "No index published yet" is deliberately absent: that is a normal state,
/// reported as [`crate::answer::AnswerOutcome::NotReady`] rather than an
/// error.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid setup (e.g. chunk overlap not smaller than chunk size).
    /// Fatal at configuration time, never per request.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Ingestion was asked to index an empty document. The previously
    /// published index, if any, stays current.
    #[error("cannot build an index from an empty document")]
    EmptyInput,

    /// A vector's length disagrees with the index dimension. Indicates the
    /// embedder configuration drifted between indexing and querying.
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The embedding provider failed or returned an unusable response.
    #[error("embedding request failed: {0}")]
    Embedder(String),

    /// The generation provider failed or returned an unusable response.
    #[error("generation request failed: {0}")]
    Generator(String),

    /// A collaborator call exceeded its deadline.
    #[error("{what} call timed out after {after:?}")]
    Timeout {
        what: &'static str,
        after: Duration,
    },

    /// A document source could not be parsed into text.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Underlying file-system failure while loading a document source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
