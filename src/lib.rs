//! # pitchdeck-analyzer
//!
//! Score a startup pitch deck (PDF) with a language model and split the
//! model's reply into five fixed categories: Problem, Solution, Market,
//! Business Model and Team.
//!
//! ## Pipeline Overview
//!
//! ```text
//! multipart upload / local file
//!  │
//!  ├─ 1. Input    pick the `file` field, check the %PDF magic
//!  ├─ 2. Extract  plain text via pdf-extract (CPU-bound, spawn_blocking)
//!  ├─ 3. Model    one chat completion: VC-analyst system prompt + deck text
//!  ├─ 4. Parse    first 1–10 integer as score, labelled sections by regex
//!  └─ 5. Output   { score, sections, rawAnalysis }
//! ```
//!
//! The pipeline is exposed over HTTP ([`server`]) and driven from the client
//! side by a small session state machine ([`client::Orchestrator`]) that can
//! talk to a server or run the pipeline in-process.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pitchdeck_analyzer::{Analyzer, AnalyzerConfig, ResultCard};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     let analyzer = Analyzer::from_config(AnalyzerConfig::default());
//!     let bytes = std::fs::read("deck.pdf")?;
//!     let result = analyzer.analyze_bytes(&bytes).await?;
//!     print!("{}", ResultCard::new(&result));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pitchdeck` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod present;
pub mod prompts;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::Analyzer;
pub use client::{
    AnalysisTransport, FileSelector, HttpTransport, LocalTransport, Orchestrator, Phase,
    SessionState,
};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, ServerConfig};
pub use error::{AnalyzerError, ErrorKind};
pub use output::{AnalysisResult, Score, SectionKey, Sections};
pub use pipeline::input::UploadedFile;
pub use pipeline::llm::{Completion, CompletionError, CompletionRequest, CompletionService};
pub use present::{ResultCard, ScoreTier};
pub use server::{build_router, AppState};
