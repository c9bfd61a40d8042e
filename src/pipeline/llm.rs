//! Completion-service seam: prompt assembly and the model call.
//!
//! The pipeline never talks to an LLM SDK directly. It builds a
//! [`CompletionRequest`] and hands it to an injected [`CompletionService`];
//! production wires in [`ProviderCompletion`] (an `edgequake-llm` provider),
//! tests wire in a fake. All prompt text lives in [`crate::prompts`].

use crate::config::AnalyzerConfig;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Role of a message in the chat exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Everything the completion service needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<PromptMessage>,
}

/// The model's reply plus usage metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// Failure reported by a completion service.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CompletionError {
    pub message: String,
}

impl CompletionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An external chat-completion API.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Short identifier used in logs, e.g. `"openai"`.
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError>;
}

/// Build the two-message exchange: system instruction, then the full deck text.
///
/// The deck text is forwarded verbatim, however long (or empty) it is.
pub fn build_request(config: &AnalyzerConfig, deck_text: &str) -> CompletionRequest {
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    CompletionRequest {
        model: config.model.clone(),
        temperature: config.temperature,
        messages: vec![
            PromptMessage::system(system_prompt),
            PromptMessage::user(deck_text),
        ],
    }
}

// ── edgequake-llm adapter ────────────────────────────────────────────────────

/// [`CompletionService`] backed by an `edgequake-llm` provider.
///
/// The model is bound when the provider is created, so `request.model` is
/// only used for logging here.
pub struct ProviderCompletion {
    name: String,
    provider: Arc<dyn LLMProvider>,
}

impl ProviderCompletion {
    pub fn new(name: impl Into<String>, provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }
}

impl fmt::Debug for ProviderCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCompletion")
            .field("name", &self.name)
            .field("provider", &"<dyn LLMProvider>")
            .finish()
    }
}

#[async_trait]
impl CompletionService for ProviderCompletion {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        let messages: Vec<ChatMessage> = request
            .messages
            .iter()
            .map(|m| match m.role {
                Role::System => ChatMessage::system(m.content.as_str()),
                Role::User => ChatMessage::user(m.content.as_str()),
            })
            .collect();

        let options = CompletionOptions {
            temperature: Some(request.temperature),
            ..Default::default()
        };

        debug!(
            "{}: sending {} messages to model {}",
            self.name,
            messages.len(),
            request.model
        );

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| CompletionError::new(e.to_string()))?;

        Ok(Completion {
            text: response.content,
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
        })
    }
}

/// Stand-in used when no provider could be built at startup.
///
/// The server still comes up; every analysis then fails at the model step
/// with the reason the provider was unavailable.
#[derive(Debug, Clone)]
pub struct UnconfiguredCompletion {
    reason: String,
}

impl UnconfiguredCompletion {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CompletionService for UnconfiguredCompletion {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, CompletionError> {
        Err(CompletionError::new(self.reason.clone()))
    }
}

// ── Provider resolution ──────────────────────────────────────────────────────

/// Resolve the completion service, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is.
/// 2. **Named provider** (`config.provider_name`) — created through
///    [`ProviderFactory::create_llm_provider`] with `config.model`; the
///    factory reads the matching API key from the environment.
/// 3. **`OPENAI_API_KEY`** present — OpenAI with `config.model`.
/// 4. **Auto-detection** ([`ProviderFactory::from_env`]).
pub fn resolve_completion(
    config: &AnalyzerConfig,
) -> Result<Arc<dyn CompletionService>, crate::error::AnalyzerError> {
    if let Some(ref provider) = config.provider {
        let name = config.provider_name.as_deref().unwrap_or("custom");
        return Ok(Arc::new(ProviderCompletion::new(name, Arc::clone(provider))));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, &config.model);
    }

    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            return create_provider("openai", &config.model);
        }
    }

    let (llm_provider, _embedding) = ProviderFactory::from_env().map_err(|e| {
        crate::error::AnalyzerError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY or pass --provider.\n\
                Error: {e}"
            ),
        }
    })?;

    Ok(Arc::new(ProviderCompletion::new("auto", llm_provider)))
}

fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn CompletionService>, crate::error::AnalyzerError> {
    let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        crate::error::AnalyzerError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })?;
    Ok(Arc::new(ProviderCompletion::new(provider_name, provider)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_has_system_then_verbatim_user_message() {
        let config = AnalyzerConfig::default();
        let text = "Our problem is X.\n\nOur solution is Y.   ";
        let req = build_request(&config, text);

        assert_eq!(req.model, "gpt-4");
        assert_eq!(req.temperature, 0.7);
        assert_eq!(
            req.messages,
            vec![
                PromptMessage::system(DEFAULT_SYSTEM_PROMPT),
                PromptMessage::user(text),
            ]
        );
    }

    #[test]
    fn empty_text_is_still_sent() {
        let req = build_request(&AnalyzerConfig::default(), "");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[1], PromptMessage::user(""));
    }

    #[test]
    fn system_prompt_override() {
        let config = AnalyzerConfig::builder()
            .system_prompt("Be brief.")
            .build()
            .unwrap();
        let req = build_request(&config, "deck");
        assert_eq!(req.messages[0].content, "Be brief.");
    }

    #[tokio::test]
    async fn unconfigured_service_always_fails() {
        let svc = UnconfiguredCompletion::new("OPENAI_API_KEY is not set");
        let req = build_request(&AnalyzerConfig::default(), "deck");
        let err = svc.complete(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY is not set");
    }
}
