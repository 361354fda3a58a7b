//! In-memory vector index with brute-force cosine similarity search.
//!
//! The corpus is bounded by single-document ingestion, so a linear scan is
//! enough at this scale. The interface deliberately does not expose that
//! assumption: callers see build and top-k search, leaving room to swap in
//! an approximate-nearest-neighbor structure later without touching them.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::providers::EmbeddingProvider;
use crate::types::{Chunk, EmbeddedChunk, RagError, ScoredChunk};

/// An immutable collection of embedded chunks built from one document.
///
/// Invariant: every stored vector has the same dimension, enforced during
/// [`VectorIndex::build`].
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<EmbeddedChunk>,
    dimension: usize,
}

impl VectorIndex {
    /// Embed every chunk (one provider call per chunk) and build a fully
    /// populated index.
    ///
    /// Fails with [`RagError::EmptyInput`] when `chunks` is empty: an index
    /// over zero vectors cannot serve similarity search meaningfully.
    /// Embedder failures propagate; a provider that changes its output
    /// dimension mid-build fails with [`RagError::DimensionMismatch`].
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self, RagError> {
        if chunks.is_empty() {
            return Err(RagError::EmptyInput);
        }

        let mut entries = Vec::with_capacity(chunks.len());
        let mut dimension: Option<usize> = None;
        for chunk in chunks {
            let vector = embedder.embed(&chunk.text).await?;
            match dimension {
                None => {
                    if vector.is_empty() {
                        return Err(RagError::Embedder(
                            "provider returned an empty embedding".to_string(),
                        ));
                    }
                    dimension = Some(vector.len());
                }
                Some(expected) if vector.len() != expected => {
                    return Err(RagError::DimensionMismatch {
                        expected,
                        actual: vector.len(),
                    });
                }
                Some(_) => {}
            }
            entries.push(EmbeddedChunk { chunk, vector });
        }

        let Some(dimension) = dimension else {
            return Err(RagError::EmptyInput);
        };
        tracing::debug!(entries = entries.len(), dimension, "vector index built");
        Ok(Self { entries, dimension })
    }

    /// Return the top `k` stored chunks by descending cosine similarity to
    /// `query`.
    ///
    /// Ties keep ingestion order (stable sort). A `k` larger than the index
    /// returns everything. A query of the wrong dimension fails with
    /// [`RagError::DimensionMismatch`]; it is never truncated or padded.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, RagError> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query, &entry.vector),
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the index holds no chunks. Never observable through the
    /// public build path, which rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimension shared by all stored vectors.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity between two equal-length vectors.
///
/// Chosen over raw dot product because embedding magnitudes are not
/// calibrated across models. Zero-magnitude vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Shared handle to the current [`VectorIndex`].
///
/// This is the only shared mutable state in the core. Ingestion publishes a
/// freshly built index with a single pointer swap; concurrent readers that
/// already loaded the previous `Arc` keep a consistent view until they drop
/// it. Concurrent publishes are last-writer-wins.
#[derive(Clone, Debug, Default)]
pub struct IndexHolder {
    current: Arc<RwLock<Option<Arc<VectorIndex>>>>,
}

impl IndexHolder {
    /// Create a holder with no published index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current index, or `None` if nothing was published yet.
    pub fn load(&self) -> Option<Arc<VectorIndex>> {
        self.current.read().clone()
    }

    /// Atomically replace the current index. The previous one is dropped
    /// once its last reader finishes.
    pub fn publish(&self, index: VectorIndex) {
        *self.current.write() = Some(Arc::new(index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockEmbeddingProvider;

    fn index_from(vectors: Vec<Vec<f32>>) -> VectorIndex {
        let dimension = vectors[0].len();
        let entries = vectors
            .into_iter()
            .enumerate()
            .map(|(i, vector)| EmbeddedChunk {
                chunk: Chunk::new(format!("chunk {i}"), i, "doc"),
                vector,
            })
            .collect();
        VectorIndex { entries, dimension }
    }

    #[tokio::test]
    async fn building_from_no_chunks_fails() {
        let embedder = MockEmbeddingProvider::new();
        let err = VectorIndex::build(Vec::new(), &embedder).await.unwrap_err();
        assert!(matches!(err, RagError::EmptyInput));
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn build_embeds_every_chunk_once() {
        let embedder = MockEmbeddingProvider::new();
        let chunks = vec![
            Chunk::new("alpha", 0, "doc"),
            Chunk::new("beta", 1, "doc"),
            Chunk::new("gamma", 2, "doc"),
        ];
        let index = VectorIndex::build(chunks, &embedder).await.unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(embedder.calls(), 3);
        assert_eq!(index.dimension(), embedder.dimension());
    }

    #[test]
    fn search_ranks_by_descending_similarity() {
        let index = index_from(vec![
            vec![0.0, 1.0],  // orthogonal to the query
            vec![1.0, 0.0],  // identical direction
            vec![1.0, 1.0],  // in between
        ]);
        let results = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk.ordinal, 1);
        assert_eq!(results[1].chunk.ordinal, 2);
        assert_eq!(results[2].chunk.ordinal, 0);
        assert!(results[0].score > results[1].score);
        assert!(results[1].score > results[2].score);
        for result in &results {
            assert!((-1.0..=1.0).contains(&result.score));
        }
    }

    #[test]
    fn search_caps_results_at_index_size() {
        let index = index_from(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let results = index.search(&[1.0, 1.0], 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn search_ties_keep_ingestion_order() {
        let index = index_from(vec![
            vec![2.0, 0.0],
            vec![1.0, 0.0], // same direction, same cosine score
            vec![3.0, 0.0],
        ]);
        let results = index.search(&[1.0, 0.0], 3).unwrap();
        let ordinals: Vec<usize> = results.iter().map(|r| r.chunk.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
    }

    #[test]
    fn wrong_query_dimension_is_rejected() {
        let index = index_from(vec![vec![1.0, 0.0, 0.0]]);
        let err = index.search(&[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn mismatched_embedder_output_fails_build() {
        struct DriftingEmbedder;

        #[async_trait::async_trait]
        impl EmbeddingProvider for DriftingEmbedder {
            async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
                // Dimension depends on the input, which a sane provider
                // never does.
                Ok(vec![1.0; text.len()])
            }
        }

        let chunks = vec![Chunk::new("ab", 0, "doc"), Chunk::new("abcd", 1, "doc")];
        let err = VectorIndex::build(chunks, &DriftingEmbedder)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { .. }));
    }

    #[test]
    fn holder_starts_empty_and_swaps_atomically() {
        let holder = IndexHolder::new();
        assert!(holder.load().is_none());

        holder.publish(index_from(vec![vec![1.0, 0.0]]));
        let first = holder.load().expect("index published");
        assert_eq!(first.len(), 1);

        // A reader holding the old snapshot keeps it across a publish.
        holder.publish(index_from(vec![vec![1.0, 0.0], vec![0.0, 1.0]]));
        assert_eq!(first.len(), 1);
        let second = holder.load().expect("index published");
        assert_eq!(second.len(), 2);
    }
}
