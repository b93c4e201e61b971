//! Document text extraction.
//!
//! Provides the [`TextExtractor`] trait and [`PdfExtractor`], which pulls
//! plain text out of a PDF with [lopdf](https://docs.rs/lopdf), page by
//! page in order. Parsing is CPU-bound, so it runs on a blocking task.

use std::path::Path;

use async_trait::async_trait;
use lopdf::Document;
use tracing::debug;

use crate::error::{RagError, Result};

/// Extracts the full text of a document as a single string.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ExtractionError`] if the document cannot be
    /// opened or parsed.
    async fn extract(&self, path: &Path) -> Result<String>;
}

/// A [`TextExtractor`] for PDF files.
///
/// Iterates every page in order and concatenates each page's plain-text
/// extraction with no separator inference beyond what the format yields.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), "extracting pdf text");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| RagError::ExtractionError(format!("failed to read file: {e}")))?;

        let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .map_err(|e| RagError::ExtractionError(format!("extraction task failed: {e}")))??;

        debug!(chars = text.len(), "extracted pdf text");
        Ok(text)
    }
}

/// Extract text from PDF bytes, page by page in page-number order.
fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let document = Document::load_mem(bytes)
        .map_err(|e| RagError::ExtractionError(format!("failed to parse PDF: {e}")))?;

    let mut text = String::new();
    // get_pages returns a BTreeMap, so iteration is already in page order.
    for page_number in document.get_pages().keys() {
        let page_text = document.extract_text(&[*page_number]).map_err(|e| {
            RagError::ExtractionError(format!("failed to extract page {page_number}: {e}"))
        })?;
        text.push_str(&page_text);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_an_extraction_error() {
        let extractor = PdfExtractor::new();
        let err = extractor.extract(Path::new("/nonexistent/file.pdf")).await.unwrap_err();
        assert!(matches!(err, RagError::ExtractionError(_)));
    }

    #[tokio::test]
    async fn corrupt_bytes_are_an_extraction_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("docbot-extract-corrupt-test.pdf");
        tokio::fs::write(&path, b"not a pdf at all").await.unwrap();

        let extractor = PdfExtractor::new();
        let err = extractor.extract(&path).await.unwrap_err();
        assert!(matches!(err, RagError::ExtractionError(_)));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
