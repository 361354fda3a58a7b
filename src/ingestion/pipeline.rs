//! Orchestration of document ingestion into the shared index.

use std::sync::Arc;

use crate::chunker::TextChunker;
use crate::index::{IndexHolder, VectorIndex};
use crate::ingestion::DocumentSource;
use crate::providers::EmbeddingProvider;
use crate::types::RagError;

/// Summary of a completed ingestion, used for response messages and logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestReport {
    pub source_id: String,
    pub chunk_count: usize,
    pub dimension: usize,
}

/// Builds a fresh [`VectorIndex`] from a document source and publishes it.
///
/// Publish-or-abort: any failure along the way leaves the previously
/// published index untouched. A successful run replaces it wholesale; there
/// is no incremental merge.
pub struct IngestionPipeline {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    holder: IndexHolder,
}

impl IngestionPipeline {
    pub fn new(
        chunker: TextChunker,
        embedder: Arc<dyn EmbeddingProvider>,
        holder: IndexHolder,
    ) -> Self {
        Self {
            chunker,
            embedder,
            holder,
        }
    }

    /// Extract, chunk, embed, and publish `source` as the current index.
    ///
    /// An empty or whitespace-only document aborts with
    /// [`RagError::EmptyInput`] before any embedding call is made.
    pub async fn ingest(&self, source: &DocumentSource) -> Result<IngestReport, RagError> {
        let source_id = source.id();
        let text = source.extract_text().await?;
        if text.trim().is_empty() {
            return Err(RagError::EmptyInput);
        }

        let chunks = self.chunker.split(&text, &source_id);
        tracing::debug!(source = %source_id, chunks = chunks.len(), "document chunked");

        let index = VectorIndex::build(chunks, self.embedder.as_ref()).await?;
        let report = IngestReport {
            source_id,
            chunk_count: index.len(),
            dimension: index.dimension(),
        };
        self.holder.publish(index);
        tracing::info!(
            source = %report.source_id,
            chunks = report.chunk_count,
            dimension = report.dimension,
            "index published"
        );
        Ok(report)
    }
}
