//! Question answering over the current index.
//!
//! The pipeline is stateless apart from reading the shared [`IndexHolder`]:
//! embed the question, retrieve the top-k chunks, interpolate them into the
//! prompt template, and hand the prompt to the generator. The generator's
//! output is returned verbatim.

use std::sync::Arc;

use crate::index::IndexHolder;
use crate::providers::{EmbeddingProvider, GenerationProvider};
use crate::types::{Answer, Question, RagError};

/// Number of chunks retrieved per question. A fixed small top-k bounds
/// prompt size and latency.
pub const DEFAULT_TOP_K: usize = 3;

/// Outcome of answering a question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The generator produced an answer from the retrieved context.
    Answered(Answer),
    /// No index has been published yet. This is a normal, expected state,
    /// not an error; no collaborator was called.
    NotReady,
}

/// Build the generator prompt from the retrieved context and the question.
///
/// The insufficient-information instruction is a prompt-level contract: the
/// generator's literal compliance is best-effort, outside this system's
/// control.
fn assemble_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a helpful AI assistant. Answer the following question based only on \
         the provided context. If the answer cannot be derived from the context, say \
         \"I don't have enough information to answer that question.\"\n\n\
         Context: {context}\n\n\
         Question: {question}\n\n\
         Answer: "
    )
}

/// Answers questions against whatever index is currently published.
pub struct AnswerPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    holder: IndexHolder,
    top_k: usize,
}

impl AnswerPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        holder: IndexHolder,
    ) -> Self {
        Self {
            embedder,
            generator,
            holder,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override the number of retrieved chunks per question.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer `question` from the current index.
    ///
    /// Returns [`AnswerOutcome::NotReady`] without touching either
    /// collaborator when no ingestion has happened yet. The snapshot taken
    /// here stays consistent even if an ingestion publishes a new index
    /// mid-request.
    pub async fn answer(&self, question: &Question) -> Result<AnswerOutcome, RagError> {
        let Some(index) = self.holder.load() else {
            tracing::debug!("question received before any ingestion");
            return Ok(AnswerOutcome::NotReady);
        };

        let query = self.embedder.embed(&question.text).await?;
        let retrieved = index.search(&query, self.top_k)?;
        tracing::debug!(
            retrieved = retrieved.len(),
            best_score = ?retrieved.first().map(|r| r.score),
            "context retrieved"
        );

        let context = retrieved
            .iter()
            .map(|scored| scored.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = assemble_prompt(&context, &question.text);
        let text = self.generator.generate(&prompt).await?;
        Ok(AnswerOutcome::Answered(Answer { text }))
    }
}
