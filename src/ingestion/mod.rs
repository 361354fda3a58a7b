//! Turning raw documents into a published vector index.
//!
//! Two pieces cooperate here:
//!
//! * [`source`] — the closed set of document source variants (plain text,
//!   PDF) behind one text-extraction capability.
//! * [`pipeline`] — the orchestration: extract → chunk → embed → build →
//!   atomically publish.

pub mod pipeline;
pub mod source;

pub use pipeline::{IngestReport, IngestionPipeline};
pub use source::DocumentSource;
