//! Environment-driven service configuration.
//!
//! Every setting has a default suitable for local development against an
//! Ollama instance on the standard port. Values are read from `RAGSERVE_*`
//! environment variables (a `.env` file is honored via `dotenvy` in main).

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::types::RagError;

/// Runtime configuration for the service binary.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Base URL of the Ollama server hosting both models.
    pub ollama_url: Url,
    /// Model used for embeddings.
    pub embedding_model: String,
    /// Model used for generation.
    pub generation_model: String,
    /// Plain-text document served by `GET /loadTextEmbeddings`.
    pub text_source: PathBuf,
    /// PDF document served by `GET /loadPdfEmbeddings`.
    pub pdf_source: PathBuf,
    /// Per-request deadline for embedder and generator calls.
    pub collaborator_timeout: Duration,
    /// Browser origin allowed by the CORS policy.
    pub allowed_origin: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3002)),
            ollama_url: Url::parse("http://localhost:11434/")
                .expect("default Ollama URL is valid"),
            embedding_model: "gemma2:2b".to_string(),
            generation_model: "gemma2:2b".to_string(),
            text_source: PathBuf::from("data/knowledge-base.txt"),
            pdf_source: PathBuf::from("data/report.pdf"),
            collaborator_timeout: Duration::from_secs(120),
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `RAGSERVE_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, RagError> {
        let defaults = Self::default();

        let bind_addr = match env::var("RAGSERVE_ADDR") {
            Ok(raw) => raw.parse().map_err(|err| {
                RagError::Configuration(format!("RAGSERVE_ADDR '{raw}' is not an address: {err}"))
            })?,
            Err(_) => defaults.bind_addr,
        };

        let ollama_url = match env::var("RAGSERVE_OLLAMA_URL") {
            Ok(raw) => Url::parse(&raw).map_err(|err| {
                RagError::Configuration(format!("RAGSERVE_OLLAMA_URL '{raw}' is not a URL: {err}"))
            })?,
            Err(_) => defaults.ollama_url,
        };

        let collaborator_timeout = match env::var("RAGSERVE_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|err| {
                    RagError::Configuration(format!(
                        "RAGSERVE_TIMEOUT_SECS '{raw}' is not a number of seconds: {err}"
                    ))
                })?;
                if secs == 0 {
                    return Err(RagError::Configuration(
                        "RAGSERVE_TIMEOUT_SECS must be positive".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            Err(_) => defaults.collaborator_timeout,
        };

        Ok(Self {
            bind_addr,
            ollama_url,
            embedding_model: env::var("RAGSERVE_EMBEDDING_MODEL")
                .unwrap_or(defaults.embedding_model),
            generation_model: env::var("RAGSERVE_GENERATION_MODEL")
                .unwrap_or(defaults.generation_model),
            text_source: env::var("RAGSERVE_TEXT_SOURCE")
                .map(PathBuf::from)
                .unwrap_or(defaults.text_source),
            pdf_source: env::var("RAGSERVE_PDF_SOURCE")
                .map(PathBuf::from)
                .unwrap_or(defaults.pdf_source),
            collaborator_timeout,
            allowed_origin: env::var("RAGSERVE_ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_ollama() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_addr.port(), 3002);
        assert_eq!(config.ollama_url.as_str(), "http://localhost:11434/");
        assert_eq!(config.embedding_model, config.generation_model);
        assert!(config.collaborator_timeout > Duration::ZERO);
    }
}
