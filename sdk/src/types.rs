//! Pipeline data model
//!
//! Records produced by the pipeline stages and threaded through the memory
//! store. Every record is immutable once stored: revisions append new values
//! instead of editing existing ones.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Research findings produced once per run by the research stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchBrief {
    /// Topic the research was done for
    pub topic: String,

    /// Free-text findings (compacted)
    pub findings: String,

    /// Bullet points extracted from the findings
    #[serde(default)]
    pub key_points: Vec<String>,

    /// Source identifiers (URLs or labels)
    #[serde(default)]
    pub sources: Vec<String>,

    /// RFC 3339 creation time
    pub timestamp: String,
}

impl ResearchBrief {
    /// Returns the first `max_chars` characters of the findings.
    pub fn findings_excerpt(&self, max_chars: usize) -> &str {
        truncate_chars(&self.findings, max_chars)
    }
}

/// One version of the article body.
///
/// Markdown-like text with `##`/`###` headers. Treated as opaque by the
/// pipeline apart from the quality heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftText(String);

impl DraftText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-separated word count
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    /// Whether the draft carries any `##` header marker
    pub fn has_structure(&self) -> bool {
        self.0.contains("##")
    }
}

impl fmt::Display for DraftText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DraftText {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DraftText {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Editorial feedback for one review iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Combined score (nominally 0-10; not clamped)
    pub score: f64,

    /// Deterministic heuristic score of the reviewed draft
    pub heuristic_score: f64,

    /// Score reported by the model (defaults to 5.0 when missing)
    pub model_score: f64,

    #[serde(default)]
    pub issues: Vec<String>,

    #[serde(default)]
    pub suggestions: Vec<String>,

    #[serde(default)]
    pub strengths: Vec<String>,

    /// 1-based review iteration
    pub iteration: u32,

    /// Whether the draft was accepted at this iteration
    pub approved: bool,

    /// Approval was forced because the iteration budget ran out
    #[serde(default)]
    pub forced_approval: bool,
}

impl FeedbackRecord {
    /// Whether the combined score alone clears `threshold`
    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

/// Keyword data produced by the SEO stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoRecord {
    /// Keywords in priority order, primary keyword first
    pub keywords: Vec<String>,

    pub topic: String,

    pub optimized: bool,
}

impl SeoRecord {
    pub fn primary_keyword(&self) -> Option<&str> {
        self.keywords.first().map(String::as_str)
    }
}

/// Search-engine meta tags for the published article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTags {
    pub title: String,
    pub description: String,
}

/// Truncate to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_word_count() {
        let draft = DraftText::new("## Title\n\nOne two three.\n\n- four");
        assert_eq!(draft.word_count(), 7);
        assert!(draft.has_structure());
    }

    #[test]
    fn test_draft_without_headers() {
        let draft = DraftText::from("plain words only");
        assert!(!draft.has_structure());
        assert_eq!(draft.as_str(), "plain words only");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_findings_excerpt() {
        let brief = ResearchBrief {
            topic: "t".to_string(),
            findings: "x".repeat(1500),
            key_points: vec![],
            sources: vec![],
            timestamp: "2025-01-01T00:00:00Z".to_string(),
        };
        assert_eq!(brief.findings_excerpt(1000).len(), 1000);
    }

    #[test]
    fn test_primary_keyword() {
        let seo = SeoRecord {
            keywords: vec!["remote work".to_string(), "productivity".to_string()],
            topic: "Remote Work".to_string(),
            optimized: true,
        };
        assert_eq!(seo.primary_keyword(), Some("remote work"));

        let empty = SeoRecord {
            keywords: vec![],
            topic: "x".to_string(),
            optimized: false,
        };
        assert_eq!(empty.primary_keyword(), None);
    }

    #[test]
    fn test_feedback_serialization_roundtrip() {
        let record = FeedbackRecord {
            score: 7.5,
            heuristic_score: 8.0,
            model_score: 7.0,
            issues: vec!["too short".to_string()],
            suggestions: vec![],
            strengths: vec!["clear".to_string()],
            iteration: 2,
            approved: true,
            forced_approval: false,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: FeedbackRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
