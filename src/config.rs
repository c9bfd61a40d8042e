//! Configuration types for the analyzer and the HTTP server.
//!
//! Every pipeline knob lives in [`AnalyzerConfig`], built via its
//! [`AnalyzerConfigBuilder`]; the listener and transport limits live in
//! [`ServerConfig`]. The API credential is never part of either struct: the
//! provider factory reads it from the process environment.

use crate::error::AnalyzerError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

/// Default model identifier sent to the completion service.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default request-body limit for uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Configuration for the analysis pipeline.
///
/// # Example
/// ```rust
/// use pitchdeck_analyzer::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .model("gpt-4.1-mini")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// LLM model identifier. Default: `gpt-4`.
    pub model: String,

    /// Sampling temperature for the completion. Default: 0.7.
    pub temperature: f32,

    /// LLM provider name (e.g. "openai", "anthropic").
    /// If None along with `provider`, the provider is detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Custom system prompt. If None, uses the built-in VC-analyst prompt.
    pub system_prompt: Option<String>,

    /// Per-call timeout for the completion service in seconds. Default: none.
    pub api_timeout_secs: Option<u64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            provider_name: None,
            provider: None,
            system_prompt: None,
            api_timeout_secs: None,
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl AnalyzerConfig {
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalyzerConfig, AnalyzerError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(AnalyzerError::InvalidConfig("model must not be empty".into()));
        }
        if c.api_timeout_secs == Some(0) {
            return Err(AnalyzerError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.system_prompt.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(AnalyzerError::InvalidConfig(
                "system prompt must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Configuration for the HTTP listener.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind. Default: 127.0.0.1:3000.
    pub bind: SocketAddr,

    /// Maximum accepted request body in bytes. Default: 10 MiB.
    ///
    /// This is the only size bound on uploads; the pipeline itself never
    /// inspects the file size.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn new(bind: SocketAddr, max_upload_bytes: usize) -> Result<Self, AnalyzerError> {
        if max_upload_bytes == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "max upload size must be ≥ 1 byte".into(),
            ));
        }
        Ok(Self {
            bind,
            max_upload_bytes,
        })
    }
}
