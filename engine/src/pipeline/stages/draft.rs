//! Draft Stage
//!
//! Writes the first draft from the research brief and revises the latest
//! draft against editorial feedback.

use super::bullet_list;
use crate::llm::{GenerationOptions, Generator};
use crate::pipeline::memory::MemoryState;
use sdk::types::{DraftText, FeedbackRecord};

pub struct DraftStage {
    generator: Generator,
    quality_threshold: f64,
}

impl DraftStage {
    pub fn new(generator: Generator, quality_threshold: f64) -> Self {
        Self {
            generator,
            quality_threshold,
        }
    }

    fn options() -> GenerationOptions {
        GenerationOptions::new(0.7, 3000)
    }

    /// Write the initial draft. A failed call yields a placeholder draft
    /// carrying the error so the run can continue.
    pub async fn write_initial(&self, memory: &MemoryState) -> DraftText {
        let topic = memory
            .research()
            .map(|r| r.topic.as_str())
            .unwrap_or("Untitled");
        let prompt = initial_prompt(memory);

        match self.generator.generate(&prompt, &Self::options()).await {
            Ok(generation) => {
                let draft = DraftText::new(generation.text);
                tracing::info!("Initial draft complete (~{} words)", draft.word_count());
                draft
            }
            Err(e) => {
                tracing::warn!("Initial draft failed: {}", e);
                DraftText::new(format!("# {}\n\n[Draft generation failed: {}]", topic, e))
            }
        }
    }

    /// Revise the latest draft against `feedback`.
    ///
    /// Returns `None` when the call fails, leaving the previous draft as the
    /// latest one.
    pub async fn revise(&self, memory: &MemoryState, feedback: &FeedbackRecord) -> Option<DraftText> {
        let current = memory.latest_draft()?;
        let prompt = revision_prompt(memory, current, feedback, self.quality_threshold);

        match self.generator.generate(&prompt, &Self::options()).await {
            Ok(generation) => {
                let draft = DraftText::new(generation.text);
                tracing::info!("Revision complete (~{} words)", draft.word_count());
                Some(draft)
            }
            Err(e) => {
                tracing::warn!("Revision failed, keeping previous draft: {}", e);
                None
            }
        }
    }
}

fn initial_prompt(memory: &MemoryState) -> String {
    let (topic, findings, key_points, sources) = match memory.research() {
        Some(brief) => (
            brief.topic.as_str(),
            brief.findings.as_str(),
            bullet_list(&brief.key_points),
            bullet_list(&brief.sources),
        ),
        None => ("Untitled", "", String::new(), String::new()),
    };

    format!(
        "You are a Writer Agent creating a high-quality blog article.

TOPIC: {topic}

RESEARCH BRIEF:
{findings}

KEY POINTS TO COVER:
{key_points}

SOURCES:
{sources}

STYLE GUIDE:
{style}

Your task:
1. Write a compelling, engaging blog article on this topic
2. Start with a strong hook that captures attention
3. Organize content with clear headers (use ## for H2, ### for H3)
4. Use natural, conversational tone while maintaining professionalism
5. Include specific examples and actionable insights
6. Cite sources naturally within the text
7. End with a thought-provoking conclusion
8. DO NOT artificially stuff keywords - write naturally

Target: 1200-1800 words

Focus purely on creating excellent, readable content. SEO optimization will be handled later.",
        style = memory.style_guide()
    )
}

fn revision_prompt(
    memory: &MemoryState,
    current: &DraftText,
    feedback: &FeedbackRecord,
    threshold: f64,
) -> String {
    let findings = memory.research().map(|r| r.findings.as_str()).unwrap_or("");

    format!(
        "You are a Writer Agent revising your blog article based on editor feedback.

ORIGINAL DRAFT:
{current}

EDITOR FEEDBACK:
Quality Score: {score:.1}/10

Issues Found:
{issues}

Suggestions:
{suggestions}

RESEARCH DATA (for reference):
{findings}

STYLE GUIDE:
{style}

Your task:
1. Address ALL issues mentioned by the editor
2. Implement the suggestions while maintaining your voice
3. Improve clarity, accuracy, and engagement
4. Keep the article structure intact unless changes are needed
5. Ensure all facts are accurate and properly cited
6. Maintain natural, readable prose

Revise the article to achieve a quality score above {threshold:.1}.",
        score = feedback.score,
        issues = bullet_list(&feedback.issues),
        suggestions = bullet_list(&feedback.suggestions),
        style = memory.style_guide()
    )
}
