//! Deterministic in-process providers for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{EmbeddingProvider, GenerationProvider};
use crate::types::RagError;

/// Embeds text as a letter-frequency histogram.
///
/// Deterministic, fast, and similarity actually tracks shared vocabulary,
/// which makes retrieval assertions in tests meaningful: texts sharing words
/// score higher than unrelated ones. Calls are counted so tests can assert
/// that short-circuit paths never reach the provider.
#[derive(Debug, Default)]
pub struct MockEmbeddingProvider {
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    const DIMENSION: usize = 26;

    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed output dimension of this provider.
    pub fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    /// Number of embed calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0f32; Self::DIMENSION];
        for c in text.chars() {
            if let Some(slot) = (c.to_ascii_lowercase() as usize).checked_sub('a' as usize) {
                if slot < Self::DIMENSION {
                    vector[slot] += 1.0;
                }
            }
        }
        Ok(vector)
    }
}

/// Returns a fixed reply and records every prompt it was given.
#[derive(Debug)]
pub struct ScriptedGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of generate calls served so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, RagError> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}
