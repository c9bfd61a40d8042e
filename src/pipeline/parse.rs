//! Reply parsing: free-text model answer → score + five sections.
//!
//! The model is asked for a score and a numbered summary but nothing enforces
//! that shape, so parsing is a best-effort regex pass. Everything fragile about
//! it is confined to [`parse_reply`], a pure function with a fixed-shape
//! output, so it can be replaced (e.g. by a structured-output mode) without
//! touching the pipeline or the presenter.
//!
//! ## Known caveats
//!
//! - The score is the *first* standalone `1`–`10` token anywhere in the reply.
//!   A stray number in prose ("2 co-founders") wins if it comes first.
//! - A label is matched at its first occurrence, even mid-sentence, as long as
//!   it is followed by whitespace or a colon.

use crate::output::{Score, SectionKey, Sections};
use once_cell::sync::Lazy;
use regex::Regex;

/// Score and sections extracted from one reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedReply {
    pub score: Option<Score>,
    pub sections: Sections,
}

/// Parse a model reply. Never fails; missing pieces become `None` / `""`.
pub fn parse_reply(reply: &str) -> ParsedReply {
    let mut sections = Sections::default();
    for key in SectionKey::ALL {
        sections.set(key, extract_section(reply, key));
    }
    ParsedReply {
        score: extract_score(reply),
        sections,
    }
}

// ── Score ────────────────────────────────────────────────────────────────────

// `[1-9]` is tried before `10`, but the trailing boundary forces the engine
// onto the `10` branch when the digit after the `1` is a `0`. Boundaries are
// ASCII-only: CJK text next to a digit does not hide it.
static RE_SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)([1-9]|10)(?-u:\b)").unwrap());

/// First standalone integer in `1..=10`.
pub fn extract_score(reply: &str) -> Option<Score> {
    RE_SCORE
        .captures(reply)
        .and_then(|caps| caps[1].parse::<u8>().ok())
        .and_then(Score::new)
}

// ── Sections ─────────────────────────────────────────────────────────────────

struct SectionPatterns {
    problem: Regex,
    solution: Regex,
    market: Regex,
    business_model: Regex,
    team: Regex,
}

impl SectionPatterns {
    fn for_key(&self, key: SectionKey) -> &Regex {
        match key {
            SectionKey::Problem => &self.problem,
            SectionKey::Solution => &self.solution,
            SectionKey::Market => &self.market,
            SectionKey::BusinessModel => &self.business_model,
            SectionKey::Team => &self.team,
        }
    }
}

/// `<label>[\s:]+` then the shortest run of anything (newlines included) up to
/// the next ASCII `N)` list marker or the end of the reply.
fn section_regex(label: &str) -> Regex {
    Regex::new(&format!(r"(?s){}[\s:]+(.*?)(?:[0-9]\)|$)", regex::escape(label))).unwrap()
}

static RE_SECTIONS: Lazy<SectionPatterns> = Lazy::new(|| SectionPatterns {
    problem: section_regex(SectionKey::Problem.label()),
    solution: section_regex(SectionKey::Solution.label()),
    market: section_regex(SectionKey::Market.label()),
    business_model: section_regex(SectionKey::BusinessModel.label()),
    team: section_regex(SectionKey::Team.label()),
});

/// Trimmed text following `key`'s label, or `""` if the label is absent.
pub fn extract_section(reply: &str, key: SectionKey) -> String {
    RE_SECTIONS
        .for_key(key)
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Score: 7\n1) Problem: X\n2) Solution: Y\n3) Market: \n4) Business Model: \n5) Team: ";

    fn score_of(reply: &str) -> Option<u8> {
        extract_score(reply).map(Score::get)
    }

    #[test]
    fn single_score_token() {
        assert_eq!(score_of("I would rate this deck 6 out of ten."), Some(6));
        assert_eq!(score_of("Score: 10"), Some(10));
        assert_eq!(score_of("Score:10/10"), Some(10));
    }

    #[test]
    fn no_score_token() {
        assert_eq!(score_of(""), None);
        assert_eq!(score_of("A solid deck, no rating given."), None);
        assert_eq!(score_of("Raised 150k with 0 churn"), None);
        assert_eq!(score_of("Score: 11"), None);
    }

    #[test]
    fn first_candidate_wins() {
        assert_eq!(score_of("Score: 8. Founded by 3 people."), Some(8));
        // Documented false positive: the stray digit comes first.
        assert_eq!(score_of("Team of 2 founders. Score: 9"), Some(2));
    }

    #[test]
    fn digits_inside_words_are_not_scores() {
        assert_eq!(score_of("Raised $5M in 2023, Q4 growth"), None);
        assert_eq!(score_of("Series B3 round"), None);
    }

    #[test]
    fn score_next_to_cjk_text() {
        assert_eq!(score_of("评分7分"), Some(7));
        assert_eq!(score_of("スコア：10点"), Some(10));
    }

    #[test]
    fn full_width_digit_is_not_a_list_marker() {
        let reply = "1) Problem: A ３) B\n2) Solution: C";
        assert_eq!(extract_section(reply, SectionKey::Problem), "A ３) B");
        assert_eq!(extract_section(reply, SectionKey::Solution), "C");
    }

    #[test]
    fn well_formed_reply_sections() {
        let parsed = parse_reply(WELL_FORMED);
        assert_eq!(parsed.score.map(Score::get), Some(7));
        assert_eq!(parsed.sections.problem, "X");
        assert_eq!(parsed.sections.solution, "Y");
        assert_eq!(parsed.sections.market, "");
        assert_eq!(parsed.sections.business_model, "");
        assert_eq!(parsed.sections.team, "");
    }

    #[test]
    fn inline_numbered_reply() {
        let reply = "1) Problem: X 2) Solution: Y 3) Market: big";
        assert_eq!(extract_section(reply, SectionKey::Problem), "X");
        assert_eq!(extract_section(reply, SectionKey::Solution), "Y");
        assert_eq!(extract_section(reply, SectionKey::Market), "big");
    }

    #[test]
    fn section_spans_lines_until_next_marker() {
        let reply = "1) Problem:\nSmall shops\ncan't forecast demand.\n2) Solution: AI";
        assert_eq!(
            extract_section(reply, SectionKey::Problem),
            "Small shops\ncan't forecast demand."
        );
    }

    #[test]
    fn missing_label_is_empty() {
        let reply = "1) Problem: X\n2) Solution: Y";
        assert_eq!(extract_section(reply, SectionKey::Team), "");
        assert_eq!(extract_section(reply, SectionKey::BusinessModel), "");
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(extract_section("problem: lower", SectionKey::Problem), "");
        assert_eq!(extract_section("TEAM: upper", SectionKey::Team), "");
    }

    #[test]
    fn label_needs_separator() {
        // "Marketing" must not be read as the Market section.
        assert_eq!(extract_section("Marketing spend is high", SectionKey::Market), "");
    }

    #[test]
    fn business_model_label_has_a_space() {
        let reply = "4) Business Model: subscriptions 5) Team: two founders";
        assert_eq!(extract_section(reply, SectionKey::BusinessModel), "subscriptions");
        assert_eq!(extract_section(reply, SectionKey::Team), "two founders");
    }

    #[test]
    fn parsing_is_idempotent() {
        let a = parse_reply(WELL_FORMED);
        let b = parse_reply(WELL_FORMED);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_reply_has_stable_shape() {
        let parsed = parse_reply("");
        assert_eq!(parsed, ParsedReply::default());
    }
}
