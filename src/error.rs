//! Error types for the pitchdeck-analyzer library.
//!
//! Pipeline failures are modelled precisely in [`AnalyzerError`] so they can
//! be logged with full detail, but the HTTP surface deliberately collapses them
//! into two public messages. [`ErrorKind`] is the coarse taxonomy that sits in
//! between: it decides the status code and the message a caller gets to see.
//!
//! Client-side failures live next to the code that produces them
//! ([`crate::client::TransportError`], [`crate::client::SelectionRejected`],
//! [`crate::client::SessionError`]).

use thiserror::Error;

/// Public message for a request that carried no `file` field.
pub const NO_FILE_MESSAGE: &str = "No file uploaded";

/// Public message for every other pipeline failure.
pub const PROCESSING_MESSAGE: &str = "Error processing PDF";

/// All errors returned by the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The multipart request had no `file` field.
    #[error("No file uploaded")]
    MissingFile,

    /// The uploaded bytes do not start with the PDF magic.
    #[error("Uploaded file is not a PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The text extractor returned an error or panicked.
    #[error("PDF text extraction failed: {detail}")]
    ExtractionFailed { detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No completion provider could be constructed (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The completion service returned an error.
    #[error("LLM API error: {message}")]
    ModelInvocation { message: String },

    /// The completion call exceeded the configured timeout.
    #[error("LLM call timed out after {secs}s")]
    ModelTimeout { secs: u64 },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (unreadable request body, task panic, …).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an [`AnalyzerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingFile,
    Extraction,
    ModelInvocation,
    Processing,
}

impl AnalyzerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyzerError::MissingFile => ErrorKind::MissingFile,
            AnalyzerError::NotAPdf { .. } | AnalyzerError::ExtractionFailed { .. } => {
                ErrorKind::Extraction
            }
            AnalyzerError::ProviderNotConfigured { .. }
            | AnalyzerError::ModelInvocation { .. }
            | AnalyzerError::ModelTimeout { .. } => ErrorKind::ModelInvocation,
            AnalyzerError::InvalidConfig(_) | AnalyzerError::Internal(_) => ErrorKind::Processing,
        }
    }

    /// `true` only when the caller is at fault (no file in the request).
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::MissingFile
    }

    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// The message a caller is allowed to see.
    pub fn public_message(&self) -> &'static str {
        if self.is_client_error() {
            NO_FILE_MESSAGE
        } else {
            PROCESSING_MESSAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_the_only_client_error() {
        assert!(AnalyzerError::MissingFile.is_client_error());
        assert_eq!(AnalyzerError::MissingFile.status_code(), 400);
        assert_eq!(AnalyzerError::MissingFile.public_message(), NO_FILE_MESSAGE);

        let others = [
            AnalyzerError::NotAPdf { magic: b"PK\x03\x04".to_vec() },
            AnalyzerError::ExtractionFailed { detail: "bad xref".into() },
            AnalyzerError::ModelInvocation { message: "401".into() },
            AnalyzerError::ModelTimeout { secs: 30 },
            AnalyzerError::Internal("boom".into()),
        ];
        for e in others {
            assert!(!e.is_client_error(), "{e}");
            assert_eq!(e.status_code(), 500);
            assert_eq!(e.public_message(), PROCESSING_MESSAGE);
        }
    }

    #[test]
    fn kinds_group_failures_by_stage() {
        assert_eq!(
            AnalyzerError::ExtractionFailed { detail: String::new() }.kind(),
            ErrorKind::Extraction
        );
        assert_eq!(
            AnalyzerError::ProviderNotConfigured {
                provider: "openai".into(),
                hint: "set OPENAI_API_KEY".into(),
            }
            .kind(),
            ErrorKind::ModelInvocation
        );
        assert_eq!(
            AnalyzerError::Internal("x".into()).kind(),
            ErrorKind::Processing
        );
    }

    #[test]
    fn timeout_display() {
        let e = AnalyzerError::ModelTimeout { secs: 45 };
        assert!(e.to_string().contains("45s"), "got: {e}");
    }

    #[test]
    fn provider_not_configured_display() {
        let e = AnalyzerError::ProviderNotConfigured {
            provider: "openai".into(),
            hint: "Set OPENAI_API_KEY".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("openai"));
        assert!(msg.contains("OPENAI_API_KEY"));
    }
}
