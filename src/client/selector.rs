//! File selection: screen a candidate before it becomes the session's file.

use crate::pipeline::input::UploadedFile;
use thiserror::Error;
use tracing::debug;

/// Notice shown to the user when a non-PDF is offered.
pub const REJECTION_NOTICE: &str = "Please upload a PDF file";

/// A candidate file was refused; the current selection is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please upload a PDF file ('{name}' is {media_type})")]
pub struct SelectionRejected {
    pub name: String,
    pub media_type: String,
}

impl SelectionRejected {
    pub fn notice(&self) -> &'static str {
        REJECTION_NOTICE
    }
}

/// Accepts a single PDF by declared media type.
///
/// The selector is a gate, not a holder: the accepted file is handed back to
/// the caller, which owns it (see [`crate::client::Orchestrator`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSelector;

impl FileSelector {
    pub fn screen(&self, candidate: UploadedFile) -> Result<UploadedFile, SelectionRejected> {
        if candidate.is_declared_pdf() {
            debug!("Accepted '{}' ({} bytes)", candidate.name(), candidate.size());
            Ok(candidate)
        } else {
            Err(SelectionRejected {
                name: candidate.name().to_string(),
                media_type: candidate.media_type().to_string(),
            })
        }
    }
}
