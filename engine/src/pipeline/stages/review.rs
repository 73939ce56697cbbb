//! Review Stage
//!
//! Scores the latest draft by blending the structural heuristic with the
//! model's own editorial score. Approval here is threshold-only; forced
//! approval on the last iteration is the controller's decision.

use crate::llm::{GenerationOptions, Generator};
use crate::pipeline::feedback::FeedbackParser;
use crate::pipeline::memory::MemoryState;
use crate::pipeline::quality::QualityScorer;
use sdk::types::{DraftText, FeedbackRecord};

/// Score recorded when the review call itself fails
pub const REVIEW_FAILURE_SCORE: f64 = 6.0;

pub struct ReviewStage {
    generator: Generator,
    quality_threshold: f64,
    context_chars: usize,
}

impl ReviewStage {
    pub fn new(generator: Generator, quality_threshold: f64, context_chars: usize) -> Self {
        Self {
            generator,
            quality_threshold,
            context_chars,
        }
    }

    /// Review the latest draft for the given 1-based iteration. Never fails.
    pub async fn run(&self, memory: &MemoryState, iteration: u32) -> FeedbackRecord {
        let empty = DraftText::new(String::new());
        let draft = memory.latest_draft().unwrap_or(&empty);
        let heuristic_score = QualityScorer::score(draft.as_str());

        let prompt = self.prompt(memory, draft);
        let record = match self
            .generator
            .generate(&prompt, &GenerationOptions::new(0.4, 1500))
            .await
        {
            Ok(generation) => {
                let review = FeedbackParser::parse(&generation.text);
                if !review.score_extracted {
                    tracing::warn!(
                        "Review response had no usable SCORE line; assuming {}",
                        review.score
                    );
                }
                let score = (heuristic_score + review.score) / 2.0;
                FeedbackRecord {
                    score,
                    heuristic_score,
                    model_score: review.score,
                    issues: review.issues,
                    suggestions: review.suggestions,
                    strengths: review.strengths,
                    iteration,
                    approved: score >= self.quality_threshold,
                    forced_approval: false,
                }
            }
            Err(e) => {
                tracing::warn!("Review failed: {}", e);
                FeedbackRecord {
                    score: REVIEW_FAILURE_SCORE,
                    heuristic_score,
                    model_score: REVIEW_FAILURE_SCORE,
                    issues: vec![format!("Review error: {}", e)],
                    suggestions: vec!["Manual review recommended".to_string()],
                    strengths: Vec::new(),
                    iteration,
                    approved: REVIEW_FAILURE_SCORE >= self.quality_threshold,
                    forced_approval: false,
                }
            }
        };

        tracing::info!(
            "Review {}: score={:.1} (heuristic={:.1}, model={:.1}), issues={}",
            iteration,
            record.score,
            record.heuristic_score,
            record.model_score,
            record.issues.len()
        );

        record
    }

    fn prompt(&self, memory: &MemoryState, draft: &DraftText) -> String {
        let findings = memory
            .research()
            .map(|r| r.findings_excerpt(self.context_chars))
            .unwrap_or("");

        format!(
            "You are an Editor Agent reviewing a blog article for quality.

DRAFT TO REVIEW:
{draft}

RESEARCH BRIEF (for fact-checking):
{findings}

STYLE GUIDE:
{style}

Evaluate the draft on these criteria:
1. **Accuracy**: Are facts correct? Any hallucinations?
2. **Structure**: Clear introduction, body, conclusion? Good flow?
3. **Engagement**: Compelling opening? Interesting throughout?
4. **Clarity**: Easy to understand? No jargon without explanation?
5. **Completeness**: Topic fully covered? No missing key points?
6. **Style**: Follows style guide? Appropriate tone?
7. **Grammar**: Proper spelling, grammar, punctuation?
8. **Citations**: Sources properly referenced?

Provide your review in this format:

SCORE: [number 1-10]

ISSUES:
- [specific issue 1]
- [specific issue 2]

SUGGESTIONS:
- [specific suggestion 1]
- [specific suggestion 2]

STRENGTHS:
- [what works well 1]
- [what works well 2]

Be constructive but thorough. If there are no issues, say so.",
            style = memory.style_guide()
        )
    }
}
