//! Pipeline stages for pitch-deck analysis.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ llm ──▶ parse
//! (sniff)   (text)      (model) (score + sections)
//! ```
//!
//! 1. [`input`]   — the uploaded file and the `%PDF` magic check
//! 2. [`extract`] — PDF → plain text; runs in `spawn_blocking`
//! 3. [`llm`]     — prompt assembly and the injected completion service; the
//!    only stage with network I/O
//! 4. [`parse`]   — regex extraction of score and sections from the reply

pub mod extract;
pub mod input;
pub mod llm;
pub mod parse;
