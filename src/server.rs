//! HTTP surface: endpoint registration, CORS, and error mapping.
//!
//! The routes mirror the service contract: two GET endpoints that (re)build
//! the index from a configured source, and one POST endpoint that answers
//! questions against whatever index is currently published.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::answer::{AnswerOutcome, AnswerPipeline};
use crate::ingestion::{DocumentSource, IngestionPipeline};
use crate::types::{Question, RagError};

/// Body returned by `POST /ask` before any ingestion has happened.
pub const NOT_READY_MESSAGE: &str = "Text embeddings not loaded yet.";

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<IngestionPipeline>,
    pub answer: Arc<AnswerPipeline>,
    pub text_source: DocumentSource,
    pub pdf_source: DocumentSource,
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct AnswerBody {
    answer: String,
}

#[derive(Deserialize)]
struct AskBody {
    question: String,
}

/// Wraps [`RagError`] so failures render as JSON HTTP responses.
struct ApiError(RagError);

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RagError::EmptyInput | RagError::InvalidDocument(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            RagError::Embedder(_) | RagError::Generator(_) => StatusCode::BAD_GATEWAY,
            RagError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            RagError::Configuration(_) | RagError::DimensionMismatch { .. } | RagError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        tracing::error!(error = %self.0, status = %status, "request failed");
        (
            status,
            Json(MessageBody {
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Build the router with the CORS policy for `allowed_origin`.
pub fn router(state: AppState, allowed_origin: &str) -> Result<Router, RagError> {
    let origin: HeaderValue = allowed_origin.parse().map_err(|err| {
        RagError::Configuration(format!("allowed origin '{allowed_origin}' is invalid: {err}"))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(600));

    Ok(Router::new()
        .route("/", get(root))
        .route("/loadTextEmbeddings", get(load_text_embeddings))
        .route("/loadPdfEmbeddings", get(load_pdf_embeddings))
        .route("/ask", post(ask))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

async fn root() -> &'static str {
    concat!("ragserve ", env!("CARGO_PKG_VERSION"), " is running")
}

async fn load_text_embeddings(
    State(state): State<AppState>,
) -> Result<Json<MessageBody>, ApiError> {
    let report = state.ingestion.ingest(&state.text_source).await?;
    tracing::info!(chunks = report.chunk_count, "text source ingested");
    Ok(Json(MessageBody {
        message: "Text embeddings loaded successfully.".to_string(),
    }))
}

async fn load_pdf_embeddings(
    State(state): State<AppState>,
) -> Result<Json<MessageBody>, ApiError> {
    let report = state.ingestion.ingest(&state.pdf_source).await?;
    tracing::info!(chunks = report.chunk_count, "pdf source ingested");
    Ok(Json(MessageBody {
        message: "PDF embeddings loaded successfully.".to_string(),
    }))
}

async fn ask(
    State(state): State<AppState>,
    Json(body): Json<AskBody>,
) -> Result<Response, ApiError> {
    let question = Question::new(body.question);
    match state.answer.answer(&question).await? {
        AnswerOutcome::Answered(answer) => {
            Ok(Json(AnswerBody { answer: answer.text }).into_response())
        }
        AnswerOutcome::NotReady => Ok(Json(MessageBody {
            message: NOT_READY_MESSAGE.to_string(),
        })
        .into_response()),
    }
}
