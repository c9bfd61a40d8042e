//! HTTP surface: `POST /api/analyze` and `GET /health`.
//!
//! The router holds a single immutable [`Analyzer`] behind an `Arc`; every
//! request is handled independently with no locking. Pipeline failures are
//! logged in full here and collapsed to two public messages at the boundary
//! (see [`crate::error`]).

use crate::analyze::Analyzer;
use crate::config::ServerConfig;
use crate::error::AnalyzerError;
use crate::output::AnalysisResult;
use crate::pipeline::input::{UploadedFile, OCTET_STREAM_MEDIA_TYPE};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Path of the analysis endpoint.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Name of the multipart field carrying the PDF.
pub const FILE_FIELD: &str = "file";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(ANALYZE_PATH, post(analyze))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `config.bind` and serve until Ctrl-C.
pub async fn run(state: AppState, config: ServerConfig) -> std::io::Result<()> {
    let app = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("pitchdeck-analyzer listening on http://{}", listener.local_addr()?);
    info!("Upload endpoint: POST {ANALYZE_PATH} (field '{FILE_FIELD}')");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/analyze
///
/// A body that is not multipart at all is a processing error (500), not a
/// client error: only a well-formed request without a `file` field gets 400.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let multipart = multipart
        .map_err(|e| AnalyzerError::Internal(format!("unreadable multipart body: {e}")))?;
    let upload = read_upload(multipart).await?;
    let result = state.analyzer.analyze_upload(upload.as_ref()).await?;
    Ok(Json(result))
}

/// Take the first `file` field; other fields are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<Option<UploadedFile>, AnalyzerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalyzerError::Internal(format!("multipart read failed: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or("upload.pdf").to_string();
        let media_type = field
            .content_type()
            .unwrap_or(OCTET_STREAM_MEDIA_TYPE)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AnalyzerError::Internal(format!("multipart read failed: {e}")))?;
        return Ok(Some(UploadedFile::from_bytes(name, media_type, bytes.to_vec())));
    }
    Ok(None)
}

// ── Error mapping ────────────────────────────────────────────────────────────

/// Boundary error: logs the detailed cause, responds with `{ "error": … }`.
#[derive(Debug)]
pub struct ApiError(pub AnalyzerError);

impl From<AnalyzerError> for ApiError {
    fn from(e: AnalyzerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_client_error() {
            warn!("Rejected analysis request: {err}");
        } else {
            error!("Error processing PDF ({:?}): {err}", err.kind());
        }

        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": err.public_message() }))).into_response()
    }
}
