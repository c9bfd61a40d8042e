//! System prompt for pitch-deck analysis.
//!
//! The section labels in the prompt are the same labels the reply parser
//! searches for ([`crate::output::SectionKey::label`]), so the two must be
//! edited together. Callers can override the prompt via
//! [`crate::config::AnalyzerConfig::system_prompt`]; the constant here is used
//! only when no override is provided.

/// Default system prompt sent ahead of the extracted deck text.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a VC analyst. Analyze the following pitch deck and score it from 1 to 10. Then summarize: 1) Problem, 2) Solution, 3) Market, 4) Business Model, 5) Team.";
