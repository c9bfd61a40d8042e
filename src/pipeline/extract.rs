//! PDF text extraction via `pdf-extract`.
//!
//! ## Why spawn_blocking?
//!
//! Extraction is CPU-bound and synchronous: it parses every content stream in
//! the document. Running it on the blocking pool keeps the Tokio workers free
//! to serve other requests while a large deck is being decoded. `pdf-extract`
//! is also known to panic on some malformed fonts; a panic inside the blocking
//! task surfaces as a `JoinError`, which we report as an extraction failure
//! instead of tearing down the connection.

use crate::error::AnalyzerError;
use tracing::{debug, warn};

/// Extract the plain text of a PDF held in memory.
///
/// Empty text is *not* an error: image-only decks produce `""` and the
/// pipeline forwards that to the model unchanged.
pub async fn extract_text(bytes: &[u8]) -> Result<String, AnalyzerError> {
    let owned = bytes.to_vec();
    let result = tokio::task::spawn_blocking(move || extract_text_blocking(&owned))
        .await
        .map_err(|e| AnalyzerError::ExtractionFailed {
            detail: format!("extractor task failed: {e}"),
        })?;

    if let Ok(ref text) = result {
        if text.trim().is_empty() {
            warn!("PDF yielded no extractable text; forwarding empty text");
        }
    }
    result
}

fn extract_text_blocking(bytes: &[u8]) -> Result<String, AnalyzerError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        AnalyzerError::ExtractionFailed {
            detail: e.to_string(),
        }
    })?;
    debug!("Extracted {} chars from {} bytes", text.len(), bytes.len());
    Ok(text)
}
