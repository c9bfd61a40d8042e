//! Transports carry an [`AnalysisRequest`] to the pipeline and bring back
//! either a result or the server's error.
//!
//! [`HttpTransport`] talks to a running server; [`LocalTransport`] runs the
//! pipeline in-process and reports failures exactly as the HTTP surface would,
//! so the session state machine cannot tell the two apart.

use crate::analyze::Analyzer;
use crate::output::AnalysisResult;
use crate::server::{ANALYZE_PATH, FILE_FIELD};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::orchestrator::AnalysisRequest;

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The pipeline answered with a non-success status.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("<no error message>"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The request never got an answer (connection refused, reset, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A success status came back with a body we could not decode.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl TransportError {
    /// The server-provided `error` message, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn send(&self, request: &AnalysisRequest) -> Result<AnalysisResult, TransportError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

// ── HTTP ─────────────────────────────────────────────────────────────────────

/// Multipart upload to `{base_url}/api/analyze`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// No request timeout is set unless `timeout` is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint_url(base_url),
        })
    }
}

fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), ANALYZE_PATH)
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn send(&self, request: &AnalysisRequest) -> Result<AnalysisResult, TransportError> {
        let file = request.file();
        let part = reqwest::multipart::Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.media_type())
            .map_err(|e| TransportError::Network(format!("invalid media type: {e}")))?;
        let form = reqwest::multipart::Form::new().part(FILE_FIELD, part);

        debug!("POST {} ({} bytes)", self.endpoint, file.size());
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty());
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<AnalysisResult>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

// ── In-process ───────────────────────────────────────────────────────────────

/// Runs the pipeline directly, mapping failures to their public form.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    analyzer: Arc<Analyzer>,
}

impl LocalTransport {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl AnalysisTransport for LocalTransport {
    async fn send(&self, request: &AnalysisRequest) -> Result<AnalysisResult, TransportError> {
        self.analyzer
            .analyze_upload(Some(request.file()))
            .await
            .map_err(|e| {
                debug!("Local analysis failed: {e}");
                TransportError::Rejected {
                    status: e.status_code(),
                    message: Some(e.public_message().to_string()),
                }
            })
    }
}
