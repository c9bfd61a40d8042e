//! The analysis pipeline: PDF bytes in, [`AnalysisResult`] out.
//!
//! [`Analyzer`] owns an injected [`CompletionService`] and the pipeline
//! configuration. It holds no mutable state, so one instance behind an `Arc`
//! serves every request concurrently.

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::output::AnalysisResult;
use crate::pipeline::input::{self, UploadedFile};
use crate::pipeline::llm::{self, CompletionService, UnconfiguredCompletion};
use crate::pipeline::{extract, parse};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct Analyzer {
    completion: Arc<dyn CompletionService>,
    config: AnalyzerConfig,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("completion", &self.completion.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Analyzer {
    /// Build an analyzer around an explicit completion service.
    pub fn new(completion: Arc<dyn CompletionService>, config: AnalyzerConfig) -> Self {
        Self { completion, config }
    }

    /// Build an analyzer whose completion service is resolved from `config`
    /// and the environment.
    ///
    /// A missing credential does not fail here: the analyzer is still built
    /// and every analysis fails at the model step instead.
    pub fn from_config(config: AnalyzerConfig) -> Self {
        let completion = match llm::resolve_completion(&config) {
            Ok(svc) => {
                info!("Using completion provider '{}' (model {})", svc.name(), config.model);
                svc
            }
            Err(e) => {
                warn!("No completion provider available: {e}");
                Arc::new(UnconfiguredCompletion::new(e.to_string())) as Arc<dyn CompletionService>
            }
        };
        Self::new(completion, config)
    }

    /// Analyse an optional upload; `None` is the "no file in request" case.
    pub async fn analyze_upload(
        &self,
        upload: Option<&UploadedFile>,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let file = upload.ok_or(AnalyzerError::MissingFile)?;
        info!("Analysing '{}' ({} bytes)", file.name(), file.size());
        self.analyze_bytes(file.bytes()).await
    }

    /// Run the whole pipeline on raw PDF bytes.
    pub async fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisResult, AnalyzerError> {
        // ── Step 1: Sniff ────────────────────────────────────────────────────
        input::ensure_pdf(bytes)?;

        // ── Step 2: Extract text ─────────────────────────────────────────────
        let extract_start = Instant::now();
        let text = extract::extract_text(bytes).await?;
        debug!(
            "Extracted {} chars in {}ms",
            text.len(),
            extract_start.elapsed().as_millis()
        );

        // ── Steps 3–5: Prompt, model, parse ──────────────────────────────────
        self.analyze_text(&text).await
    }

    /// Send already-extracted deck text to the model and parse the reply.
    pub async fn analyze_text(&self, deck_text: &str) -> Result<AnalysisResult, AnalyzerError> {
        let request = llm::build_request(&self.config, deck_text);

        let llm_start = Instant::now();
        let call = self.completion.complete(&request);
        let outcome = match self.config.api_timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), call)
                .await
                .map_err(|_| AnalyzerError::ModelTimeout { secs })?,
            None => call.await,
        };
        let completion = outcome.map_err(|e| AnalyzerError::ModelInvocation {
            message: e.to_string(),
        })?;

        info!(
            "{}: {} input tokens, {} output tokens, {}ms",
            self.completion.name(),
            completion.input_tokens,
            completion.output_tokens,
            llm_start.elapsed().as_millis()
        );

        let parsed = parse::parse_reply(&completion.text);
        if parsed.score.is_none() {
            warn!("Model reply contained no 1–10 score");
        }

        Ok(AnalysisResult {
            score: parsed.score,
            sections: parsed.sections,
            raw_analysis: completion.text,
        })
    }
}
