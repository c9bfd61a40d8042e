//! Client side of the analyzer: the pieces a front end drives.
//!
//! - [`selector`]     — screens candidate files (PDF only)
//! - [`orchestrator`] — the session state machine
//! - [`transport`]    — how a request reaches the pipeline (HTTP or in-process)
//!
//! Rendering lives in [`crate::present`].

pub mod orchestrator;
pub mod selector;
pub mod transport;

pub use orchestrator::{
    AnalysisRequest, Orchestrator, Phase, SessionError, SessionState, FAILURE_FALLBACK,
};
pub use selector::{FileSelector, SelectionRejected, REJECTION_NOTICE};
pub use transport::{AnalysisTransport, HttpTransport, LocalTransport, TransportError};
