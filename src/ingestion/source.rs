//! Document sources the service can ingest.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::types::RagError;

/// A closed set of ingestable document kinds, each yielding UTF-8 text.
///
/// Dispatch is by variant, not by runtime shape inspection; adding a format
/// means adding a variant here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentSource {
    /// A plain-text file read as-is.
    PlainText(PathBuf),
    /// A PDF file whose per-page text is extracted and concatenated.
    Pdf(PathBuf),
}

impl DocumentSource {
    pub fn plain_text(path: impl Into<PathBuf>) -> Self {
        Self::PlainText(path.into())
    }

    pub fn pdf(path: impl Into<PathBuf>) -> Self {
        Self::Pdf(path.into())
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        match self {
            Self::PlainText(path) | Self::Pdf(path) => path,
        }
    }

    /// Stable identifier attached to every chunk cut from this source.
    pub fn id(&self) -> String {
        self.path().display().to_string()
    }

    /// Load the document and extract its text content.
    ///
    /// PDF parsing is CPU-bound and runs on the blocking pool so it does
    /// not stall concurrent requests.
    pub async fn extract_text(&self) -> Result<String, RagError> {
        match self {
            Self::PlainText(path) => Ok(fs::read_to_string(path).await?),
            Self::Pdf(path) => {
                let path = path.clone();
                tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
                    .await
                    .map_err(|err| {
                        RagError::InvalidDocument(format!("pdf extraction task failed: {err}"))
                    })?
                    .map_err(|err| {
                        RagError::InvalidDocument(format!("failed to parse pdf: {err}"))
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn plain_text_source_reads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "some document body").unwrap();

        let source = DocumentSource::plain_text(file.path());
        let text = source.extract_text().await.unwrap();
        assert_eq!(text, "some document body");
        assert_eq!(source.id(), file.path().display().to_string());
    }

    #[tokio::test]
    async fn missing_plain_text_source_surfaces_io_error() {
        let source = DocumentSource::plain_text("/nonexistent/definitely-not-here.txt");
        let err = source.extract_text().await.unwrap_err();
        assert!(matches!(err, RagError::Io(_)));
    }

    #[tokio::test]
    async fn garbage_pdf_is_an_invalid_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not a pdf").unwrap();

        let source = DocumentSource::pdf(file.path());
        let err = source.extract_text().await.unwrap_err();
        assert!(matches!(err, RagError::InvalidDocument(_)));
    }
}
