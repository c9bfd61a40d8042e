//! Client session: a small state machine around one selected file.
//!
//! ```text
//!            offer_file                 begin_analysis
//!   Idle ───────────────▶ Ready ───────────────────────▶ Analyzing
//!    ▲                      ▲                              │
//!    │ clear_file           │ offer_file        complete   │
//!    └──── (any state) ─────┴─────────── Succeeded ◀───────┤
//!                                        Failed    ◀───────┘
//! ```
//!
//! The file, the result and the error message are carried by the state
//! variants themselves, so "analyzing without a file" or "a result next to an
//! error" cannot be represented. `Succeeded` and `Failed` keep the file so the
//! user can resubmit it directly.

use super::selector::{FileSelector, SelectionRejected};
use super::transport::{AnalysisTransport, TransportError};
use crate::output::AnalysisResult;
use crate::pipeline::input::UploadedFile;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Shown when a failure carries no server-provided message.
pub const FAILURE_FALLBACK: &str = "Failed to analyze pitch deck";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Ready {
        file: Arc<UploadedFile>,
    },
    Analyzing {
        file: Arc<UploadedFile>,
        request_id: u64,
    },
    Succeeded {
        file: Arc<UploadedFile>,
        result: AnalysisResult,
    },
    Failed {
        file: Arc<UploadedFile>,
        message: String,
    },
}

/// Field-less view of [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
    Analyzing,
    Succeeded,
    Failed,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::Ready { .. } => Phase::Ready,
            SessionState::Analyzing { .. } => Phase::Analyzing,
            SessionState::Succeeded { .. } => Phase::Succeeded,
            SessionState::Failed { .. } => Phase::Failed,
        }
    }

    fn file(&self) -> Option<&Arc<UploadedFile>> {
        match self {
            SessionState::Idle => None,
            SessionState::Ready { file }
            | SessionState::Analyzing { file, .. }
            | SessionState::Succeeded { file, .. }
            | SessionState::Failed { file, .. } => Some(file),
        }
    }
}

/// One in-flight submission.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    id: u64,
    file: Arc<UploadedFile>,
}

impl AnalysisRequest {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn file(&self) -> &UploadedFile {
        &self.file
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no file selected")]
    NoFile,
    #[error("an analysis is already in progress")]
    AlreadyAnalyzing,
}

#[derive(Debug)]
pub struct Orchestrator {
    selector: FileSelector,
    state: SessionState,
    next_request_id: u64,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            selector: FileSelector,
            state: SessionState::Idle,
            next_request_id: 1,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.state.file().map(|f| f.as_ref())
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            SessionState::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        matches!(
            self.phase(),
            Phase::Ready | Phase::Succeeded | Phase::Failed
        )
    }

    /// Offer a file from a drop or the picker. Accepted files replace the
    /// current selection and clear any result or error; rejected files leave
    /// the session untouched.
    pub fn offer_file(&mut self, candidate: UploadedFile) -> Result<(), SelectionRejected> {
        let file = self.selector.screen(candidate)?;
        if self.phase() == Phase::Analyzing {
            debug!("New file selected while analysing; the pending result will be dropped");
        }
        self.state = SessionState::Ready {
            file: Arc::new(file),
        };
        Ok(())
    }

    /// Remove the current selection.
    pub fn clear_file(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Move to `Analyzing` and hand out the request to send.
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, SessionError> {
        let file = match &self.state {
            SessionState::Idle => return Err(SessionError::NoFile),
            SessionState::Analyzing { .. } => return Err(SessionError::AlreadyAnalyzing),
            SessionState::Ready { file }
            | SessionState::Succeeded { file, .. }
            | SessionState::Failed { file, .. } => Arc::clone(file),
        };

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.state = SessionState::Analyzing {
            file: Arc::clone(&file),
            request_id: id,
        };
        Ok(AnalysisRequest { id, file })
    }

    /// Apply the outcome of request `request_id`.
    ///
    /// Returns `false` (and changes nothing) when the outcome is stale: the
    /// file was replaced or cleared while the request was in flight.
    pub fn complete(
        &mut self,
        request_id: u64,
        outcome: Result<AnalysisResult, TransportError>,
    ) -> bool {
        let file = match &self.state {
            SessionState::Analyzing { file, request_id: current } if *current == request_id => {
                Arc::clone(file)
            }
            _ => {
                debug!("Discarding stale outcome of request {request_id}");
                return false;
            }
        };

        self.state = match outcome {
            Ok(result) => {
                info!("Analysis of '{}' succeeded", file.name());
                SessionState::Succeeded { file, result }
            }
            Err(e) => {
                warn!("{FAILURE_FALLBACK}: {e}");
                SessionState::Failed {
                    file,
                    message: failure_message(&e),
                }
            }
        };
        true
    }

    /// Submit the current file through `transport` and wait for the outcome.
    pub async fn analyze(
        &mut self,
        transport: &dyn AnalysisTransport,
    ) -> Result<Phase, SessionError> {
        let request = self.begin_analysis()?;
        let outcome = transport.send(&request).await;
        self.complete(request.id(), outcome);
        Ok(self.phase())
    }
}

fn failure_message(e: &TransportError) -> String {
    e.server_message().unwrap_or(FAILURE_FALLBACK).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Score, Sections};
    use crate::pipeline::input::PDF_MEDIA_TYPE;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn pdf(name: &str) -> UploadedFile {
        UploadedFile::from_bytes(name, PDF_MEDIA_TYPE, b"%PDF-1.4".to_vec())
    }

    fn sample_result(score: u8) -> AnalysisResult {
        AnalysisResult {
            score: Score::new(score),
            sections: Sections {
                problem: "X".into(),
                ..Default::default()
            },
            raw_analysis: format!("Score: {score}"),
        }
    }

    struct FakeTransport {
        outcome: Result<AnalysisResult, TransportError>,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AnalysisTransport for FakeTransport {
        async fn send(
            &self,
            request: &AnalysisRequest,
        ) -> Result<AnalysisResult, TransportError> {
            self.sent.lock().unwrap().push(request.file().name().to_string());
            self.outcome.clone()
        }
    }

    #[test]
    fn starts_idle_and_cannot_submit() {
        let mut o = Orchestrator::new();
        assert_eq!(o.phase(), Phase::Idle);
        assert!(!o.can_submit());
        assert_eq!(o.begin_analysis().unwrap_err(), SessionError::NoFile);
    }

    #[test]
    fn selecting_moves_to_ready() {
        let mut o = Orchestrator::new();
        o.offer_file(pdf("deck.pdf")).unwrap();
        assert_eq!(o.phase(), Phase::Ready);
        assert_eq!(o.file().map(|f| f.name()), Some("deck.pdf"));
        assert!(o.can_submit());
    }

    #[test]
    fn rejected_file_leaves_selection_untouched() {
        let mut o = Orchestrator::new();
        o.offer_file(pdf("deck.pdf")).unwrap();
        let err = o
            .offer_file(UploadedFile::from_bytes("a.png", "image/png", vec![1, 2, 3]))
            .unwrap_err();
        assert_eq!(err.notice(), "Please upload a PDF file");
        assert_eq!(o.phase(), Phase::Ready);
        assert_eq!(o.file().map(|f| f.name()), Some("deck.pdf"));
    }

    #[test]
    fn no_double_submission() {
        let mut o = Orchestrator::new();
        o.offer_file(pdf("deck.pdf")).unwrap();
        let _req = o.begin_analysis().unwrap();
        assert_eq!(o.phase(), Phase::Analyzing);
        assert!(!o.can_submit());
        assert_eq!(o.begin_analysis().unwrap_err(), SessionError::AlreadyAnalyzing);
    }

    #[test]
    fn success_then_reselect_clears_result() {
        let mut o = Orchestrator::new();
        o.offer_file(pdf("a.pdf")).unwrap();
        let req = o.begin_analysis().unwrap();
        assert!(o.complete(req.id(), Ok(sample_result(8))));
        assert_eq!(o.phase(), Phase::Succeeded);
        assert_eq!(o.result().and_then(|r| r.score).map(Score::get), Some(8));

        o.offer_file(pdf("b.pdf")).unwrap();
        assert_eq!(o.phase(), Phase::Ready);
        assert!(o.result().is_none());
        assert!(o.error().is_none());
    }

    #[test]
    fn failure_uses_server_message() {
        let mut o = Orchestrator::new();
        o.offer_file(pdf("a.pdf")).unwrap();
        let req = o.begin_analysis().unwrap();
        o.complete(
            req.id(),
            Err(TransportError::Rejected {
                status: 500,
                message: Some("Error processing PDF".into()),
            }),
        );
        assert_eq!(o.phase(), Phase::Failed);
        assert_eq!(o.error(), Some("Error processing PDF"));
        assert!(o.result().is_none());
    }

    #[test]
    fn failure_without_message_uses_fallback() {
        for err in [
            TransportError::Network("connection refused".into()),
            TransportError::Rejected {
                status: 502,
                message: None,
            },
            TransportError::Decode("expected value".into()),
        ] {
            let mut o = Orchestrator::new();
            o.offer_file(pdf("a.pdf")).unwrap();
            let req = o.begin_analysis().unwrap();
            o.complete(req.id(), Err(err));
            assert_eq!(o.error(), Some(FAILURE_FALLBACK));
        }
    }

    #[test]
    fn failed_session_can_retry() {
        let mut o = Orchestrator::new();
        o.offer_file(pdf("a.pdf")).unwrap();
        let first = o.begin_analysis().unwrap();
        o.complete(first.id(), Err(TransportError::Network("reset".into())));
        assert!(o.can_submit());

        let second = o.begin_analysis().unwrap();
        assert_ne!(first.id(), second.id());
        assert!(o.error().is_none());
        assert!(o.complete(second.id(), Ok(sample_result(6))));
        assert_eq!(o.phase(), Phase::Succeeded);
    }

    #[test]
    fn stale_outcome_after_reselect_is_ignored() {
        let mut o = Orchestrator::new();
        o.offer_file(pdf("a.pdf")).unwrap();
        let req = o.begin_analysis().unwrap();
        o.offer_file(pdf("b.pdf")).unwrap();

        assert!(!o.complete(req.id(), Ok(sample_result(9))));
        assert_eq!(o.phase(), Phase::Ready);
        assert_eq!(o.file().map(|f| f.name()), Some("b.pdf"));
    }

    #[test]
    fn stale_outcome_after_clear_is_ignored() {
        let mut o = Orchestrator::new();
        o.offer_file(pdf("a.pdf")).unwrap();
        let req = o.begin_analysis().unwrap();
        o.clear_file();
        assert!(!o.complete(req.id(), Ok(sample_result(9))));
        assert_eq!(o.phase(), Phase::Idle);
    }

    #[test]
    fn analyze_drives_the_transport() {
        let transport = FakeTransport {
            outcome: Ok(sample_result(7)),
            sent: Mutex::new(Vec::new()),
        };
        let mut o = Orchestrator::new();
        o.offer_file(pdf("deck.pdf")).unwrap();

        let phase = tokio_test::block_on(o.analyze(&transport)).unwrap();
        assert_eq!(phase, Phase::Succeeded);
        assert_eq!(*transport.sent.lock().unwrap(), vec!["deck.pdf".to_string()]);
    }

    #[test]
    fn analyze_without_file_sends_nothing() {
        let transport = FakeTransport {
            outcome: Ok(sample_result(7)),
            sent: Mutex::new(Vec::new()),
        };
        let mut o = Orchestrator::new();
        let err = tokio_test::block_on(o.analyze(&transport)).unwrap_err();
        assert_eq!(err, SessionError::NoFile);
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
