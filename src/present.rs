//! Terminal rendering of an [`AnalysisResult`].
//!
//! The score drives a three-tier colour scale shared by the score label and
//! the progress bar:
//!
//! | Score     | Tier     | Colour |
//! |-----------|----------|--------|
//! | 8–10      | High     | green  |
//! | 6–7       | Medium   | yellow |
//! | 1–5       | Low      | red    |
//! | absent    | Neutral  | dim    |

use crate::output::{AnalysisResult, Score};
use crate::pipeline::input::UploadedFile;
use std::fmt;

/// Shown in place of a section the model did not fill in.
pub const EMPTY_SECTION_PLACEHOLDER: &str = "No information provided";

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
    Neutral,
}

impl ScoreTier {
    pub fn for_score(score: Option<Score>) -> Self {
        match score.map(Score::get) {
            Some(s) if s >= 8 => ScoreTier::High,
            Some(s) if s >= 6 => ScoreTier::Medium,
            Some(_) => ScoreTier::Low,
            None => ScoreTier::Neutral,
        }
    }

    /// SGR parameter for this tier.
    fn sgr(self) -> &'static str {
        match self {
            ScoreTier::High => "32",
            ScoreTier::Medium => "33",
            ScoreTier::Low => "31",
            ScoreTier::Neutral => "2",
        }
    }

    /// Wrap `text` in this tier's colour, or return it unchanged.
    pub fn paint(self, text: &str, color: bool) -> String {
        if color {
            format!("\x1b[{}m{text}\x1b[0m", self.sgr())
        } else {
            text.to_string()
        }
    }
}

/// `"7/10"`, or `"N/A"` without a score.
pub fn score_label(score: Option<Score>) -> String {
    match score {
        Some(s) => format!("{s}/10"),
        None => "N/A".to_string(),
    }
}

/// Progress indicator value on a 0–100 scale; `None` means no indicator.
pub fn progress_value(score: Option<Score>) -> Option<u8> {
    score.map(|s| s.get() * 10)
}

/// Section body for display.
pub fn section_text(text: &str) -> &str {
    if text.is_empty() {
        EMPTY_SECTION_PLACEHOLDER
    } else {
        text
    }
}

/// `"deck.pdf (2.00 MB)"`.
pub fn describe_file(file: &UploadedFile) -> String {
    let mb = file.size() as f64 / 1024.0 / 1024.0;
    format!("{} ({mb:.2} MB)", file.name())
}

/// A printable result card.
#[derive(Debug, Clone, Copy)]
pub struct ResultCard<'a> {
    result: &'a AnalysisResult,
    color: bool,
}

impl<'a> ResultCard<'a> {
    pub fn new(result: &'a AnalysisResult) -> Self {
        Self {
            result,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            format!("\x1b[1m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl fmt::Display for ResultCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let score = self.result.score;
        let tier = ScoreTier::for_score(score);

        writeln!(
            f,
            "{}  {}",
            self.bold("Pitch Deck Score"),
            tier.paint(&score_label(score), self.color)
        )?;

        if let Some(value) = progress_value(score) {
            let filled = usize::from(value) * BAR_WIDTH / 100;
            let bar = format!(
                "{}{}",
                "█".repeat(filled),
                "░".repeat(BAR_WIDTH - filled)
            );
            writeln!(f, "[{}] {value:>3}%", tier.paint(&bar, self.color))?;
        }

        for (key, text) in self.result.sections.iter() {
            writeln!(f)?;
            writeln!(f, "{}", self.bold(key.label()))?;
            for line in section_text(text).lines() {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}
