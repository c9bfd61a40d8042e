//! Result types returned by the analysis pipeline.
//!
//! [`AnalysisResult`] is also the JSON body of a successful
//! `POST /api/analyze`, so field names follow the wire format (camelCase).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pitch-deck score, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Returns `None` for values outside `1..=10`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Score::new(value).ok_or_else(|| format!("score must be 1–10, got {value}"))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The five fixed analysis categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey {
    Problem,
    Solution,
    Market,
    BusinessModel,
    Team,
}

impl SectionKey {
    pub const ALL: [SectionKey; 5] = [
        SectionKey::Problem,
        SectionKey::Solution,
        SectionKey::Market,
        SectionKey::BusinessModel,
        SectionKey::Team,
    ];

    /// The exact, case-sensitive label the model is asked to use.
    pub fn label(self) -> &'static str {
        match self {
            SectionKey::Problem => "Problem",
            SectionKey::Solution => "Solution",
            SectionKey::Market => "Market",
            SectionKey::BusinessModel => "Business Model",
            SectionKey::Team => "Team",
        }
    }
}

/// Section excerpts. Every field is always present; missing sections are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub problem: String,
    pub solution: String,
    pub market: String,
    pub business_model: String,
    pub team: String,
}

impl Sections {
    pub fn get(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::Problem => &self.problem,
            SectionKey::Solution => &self.solution,
            SectionKey::Market => &self.market,
            SectionKey::BusinessModel => &self.business_model,
            SectionKey::Team => &self.team,
        }
    }

    pub fn set(&mut self, key: SectionKey, text: String) {
        match key {
            SectionKey::Problem => self.problem = text,
            SectionKey::Solution => self.solution = text,
            SectionKey::Market => self.market = text,
            SectionKey::BusinessModel => self.business_model = text,
            SectionKey::Team => self.team = text,
        }
    }

    /// Iterate `(key, text)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &str)> + '_ {
        SectionKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// The normalised outcome of one successful analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// `null` on the wire when the reply contained no 1–10 token.
    pub score: Option<Score>,
    pub sections: Sections,
    /// The full, untouched model reply.
    pub raw_analysis: String,
}
