//! Review Parsing
//!
//! Turns a semi-structured editorial review into scores and item lists.
//! The parser is line oriented and total: any input yields a result.
//!
//! Recognized layout:
//!
//! ```text
//! SCORE: 8.5/10
//! ISSUES:
//! - too short
//! SUGGESTIONS:
//! - add examples
//! STRENGTHS:
//! - clear intro
//! ```
//!
//! Section labels may be wrapped in markdown emphasis (`**ISSUES:**`).

use regex::Regex;
use std::sync::OnceLock;

/// Score used when the review carries no usable `SCORE:` line
pub const DEFAULT_MODEL_SCORE: f64 = 5.0;

static NUMBER: OnceLock<Regex> = OnceLock::new();

fn number_pattern() -> &'static Regex {
    NUMBER.get_or_init(|| Regex::new(r"\d+\.?\d*").expect("Invalid number pattern"))
}

/// Structured view of a review response
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReview {
    pub score: f64,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    /// False when the score fell back to the default
    pub score_extracted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Issues,
    Suggestions,
    Strengths,
}

pub struct FeedbackParser;

impl FeedbackParser {
    pub fn parse(review_text: &str) -> ParsedReview {
        let mut review = ParsedReview {
            score: DEFAULT_MODEL_SCORE,
            issues: Vec::new(),
            suggestions: Vec::new(),
            strengths: Vec::new(),
            score_extracted: false,
        };
        let mut current: Option<Section> = None;

        for raw in review_text.lines() {
            let line = raw.trim();
            let label = normalize_label(line);

            if let Some(rest) = label.strip_prefix("SCORE:") {
                // First numeric token on the line; a later SCORE line overrides
                if let Some(score) = number_pattern()
                    .find(rest)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                    .filter(|score| score.is_finite())
                {
                    review.score = score;
                    review.score_extracted = true;
                }
            } else if label.starts_with("ISSUES:") {
                current = Some(Section::Issues);
            } else if label.starts_with("SUGGESTIONS:") {
                current = Some(Section::Suggestions);
            } else if label.starts_with("STRENGTHS:") {
                current = Some(Section::Strengths);
            } else if let Some(item) = line.strip_prefix("- ") {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                match current {
                    Some(Section::Issues) => review.issues.push(item.to_string()),
                    Some(Section::Suggestions) => review.suggestions.push(item.to_string()),
                    Some(Section::Strengths) => review.strengths.push(item.to_string()),
                    None => {}
                }
            }
        }

        review
    }
}

/// Strip markdown emphasis and heading markers around a label
fn normalize_label(line: &str) -> String {
    line.trim_start_matches(['#', '*', ' '])
        .replace("**", "")
        .to_uppercase()
}
