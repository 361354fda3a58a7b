use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use ragserve::answer::AnswerPipeline;
use ragserve::chunker::TextChunker;
use ragserve::config::ServiceConfig;
use ragserve::index::IndexHolder;
use ragserve::ingestion::{DocumentSource, IngestionPipeline};
use ragserve::providers::{
    EmbeddingProvider, GenerationProvider, OllamaEmbeddings, OllamaGenerator,
};
use ragserve::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let config = ServiceConfig::from_env()?;
    let http = reqwest::Client::builder()
        .user_agent(concat!("ragserve/", env!("CARGO_PKG_VERSION")))
        .use_rustls_tls()
        .build()?;

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbeddings::new(
        http.clone(),
        &config.ollama_url,
        &config.embedding_model,
        config.collaborator_timeout,
    )?);
    let generator: Arc<dyn GenerationProvider> = Arc::new(OllamaGenerator::new(
        http,
        &config.ollama_url,
        &config.generation_model,
        config.collaborator_timeout,
    )?);

    let holder = IndexHolder::new();
    let state = AppState {
        ingestion: Arc::new(IngestionPipeline::new(
            TextChunker::with_defaults(),
            embedder.clone(),
            holder.clone(),
        )),
        answer: Arc::new(AnswerPipeline::new(embedder, generator, holder)),
        text_source: DocumentSource::plain_text(config.text_source.clone()),
        pdf_source: DocumentSource::pdf(config.pdf_source.clone()),
    };

    let router = server::router(state, &config.allowed_origin)?;
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        ollama = %config.ollama_url,
        embedding_model = %config.embedding_model,
        generation_model = %config.generation_model,
        "serving"
    );
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
