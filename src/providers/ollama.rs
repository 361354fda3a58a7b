//! Ollama-backed providers for embeddings and generation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{EmbeddingProvider, GenerationProvider};
use crate::types::RagError;

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// [`EmbeddingProvider`] backed by Ollama's `/api/embeddings` endpoint.
#[derive(Clone, Debug)]
pub struct OllamaEmbeddings {
    http: Client,
    endpoint: Url,
    model: String,
    timeout: Duration,
}

impl OllamaEmbeddings {
    /// Build a provider talking to `base_url` with the given per-request
    /// timeout.
    pub fn new(
        http: Client,
        base_url: &Url,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RagError> {
        Ok(Self {
            http,
            endpoint: join_endpoint(base_url, "api/embeddings")?,
            model: model.into(),
            timeout,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&EmbeddingsRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    RagError::Timeout {
                        what: "embedding",
                        after: self.timeout,
                    }
                } else {
                    RagError::Embedder(err.to_string())
                }
            })?
            .error_for_status()
            .map_err(|err| RagError::Embedder(err.to_string()))?;

        let payload: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|err| RagError::Embedder(format!("malformed response: {err}")))?;
        if payload.embedding.is_empty() {
            return Err(RagError::Embedder("empty embedding in response".to_string()));
        }
        Ok(payload.embedding)
    }
}

/// [`GenerationProvider`] backed by Ollama's `/api/generate` endpoint.
///
/// Streaming is disabled; the whole completion arrives in one response.
#[derive(Clone, Debug)]
pub struct OllamaGenerator {
    http: Client,
    endpoint: Url,
    model: String,
    timeout: Duration,
}

impl OllamaGenerator {
    pub fn new(
        http: Client,
        base_url: &Url,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RagError> {
        Ok(Self {
            http,
            endpoint: join_endpoint(base_url, "api/generate")?,
            model: model.into(),
            timeout,
        })
    }
}

#[async_trait]
impl GenerationProvider for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, RagError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    RagError::Timeout {
                        what: "generation",
                        after: self.timeout,
                    }
                } else {
                    RagError::Generator(err.to_string())
                }
            })?
            .error_for_status()
            .map_err(|err| RagError::Generator(err.to_string()))?;

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|err| RagError::Generator(format!("malformed response: {err}")))?;
        Ok(payload.response)
    }
}

/// Resolve an API path against the configured base URL. A base without a
/// trailing slash would otherwise swallow its last path segment on join.
fn join_endpoint(base_url: &Url, path: &str) -> Result<Url, RagError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base.join(path)
        .map_err(|err| RagError::Configuration(format!("invalid Ollama base URL: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_join_handles_missing_trailing_slash() {
        let base = Url::parse("http://localhost:11434").unwrap();
        let endpoint = join_endpoint(&base, "api/embeddings").unwrap();
        assert_eq!(endpoint.as_str(), "http://localhost:11434/api/embeddings");

        let nested = Url::parse("http://proxy.local/ollama").unwrap();
        let endpoint = join_endpoint(&nested, "api/generate").unwrap();
        assert_eq!(endpoint.as_str(), "http://proxy.local/ollama/api/generate");
    }
}
