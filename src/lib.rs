//! Minimal retrieval-augmented generation service.
//!
//! ```text
//! DocumentSource (text | pdf) ──► IngestionPipeline
//!                                      │
//!                   TextChunker ◄──────┤
//!                                      ▼
//!                  EmbeddingProvider (one call per chunk)
//!                                      │
//!                                      ▼
//!                  VectorIndex::build ──► IndexHolder (atomic publish)
//!                                              │
//! Question ──► AnswerPipeline ◄────────────────┘
//!                   │   embed question, top-k cosine search,
//!                   │   prompt assembly
//!                   ▼
//!            GenerationProvider ──► Answer
//! ```
//!
//! The core is the ingestion → indexing → retrieval → answer pipeline. The
//! embedding and generative models are opaque network collaborators behind
//! the [`providers`] traits; the HTTP surface in [`server`] is a thin layer
//! over the two pipelines. The index lives in process memory only and is
//! replaced wholesale on every ingestion.

pub mod answer;
pub mod chunker;
pub mod config;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

pub use answer::{AnswerOutcome, AnswerPipeline};
pub use chunker::{ChunkerConfig, TextChunker};
pub use index::{IndexHolder, VectorIndex};
pub use ingestion::{DocumentSource, IngestionPipeline};
pub use types::{Answer, Chunk, EmbeddedChunk, Question, RagError, ScoredChunk};
