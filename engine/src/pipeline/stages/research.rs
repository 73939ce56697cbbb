//! Research Stage
//!
//! Builds the research brief for a topic. Tries a search-grounded call
//! first, then a plain call relying on model knowledge, then a placeholder
//! brief that records why research failed.

use crate::llm::{GenerationOptions, Generator};
use crate::pipeline::quality::is_list_item;
use sdk::types::{truncate_chars, ResearchBrief};

const MAX_KEY_POINTS: usize = 7;

/// Source label used when findings come from the model alone
pub const TRAINING_DATA_SOURCE: &str = "Model training data";

pub struct ResearchStage {
    generator: Generator,
    context_chars: usize,
}

impl ResearchStage {
    pub fn new(generator: Generator, context_chars: usize) -> Self {
        Self {
            generator,
            context_chars,
        }
    }

    /// Produce a research brief. Never fails.
    pub async fn run(&self, topic: &str) -> ResearchBrief {
        let grounded = GenerationOptions::new(0.3, 2048).with_grounding();

        match self.generator.generate(&grounded_prompt(topic), &grounded).await {
            Ok(generation) => {
                let brief = self.assemble(topic, &generation.text, generation.sources);
                tracing::info!(
                    "Research complete: {} sources, {} key points",
                    brief.sources.len(),
                    brief.key_points.len()
                );
                return brief;
            }
            Err(e) => {
                tracing::warn!("Grounded research failed, using model knowledge: {}", e);
            }
        }

        let plain = GenerationOptions::new(0.3, 1500);
        match self.generator.generate(&fallback_prompt(topic), &plain).await {
            Ok(generation) => {
                self.assemble(topic, &generation.text, vec![TRAINING_DATA_SOURCE.to_string()])
            }
            Err(e) => {
                tracing::warn!("Fallback research failed: {}", e);
                ResearchBrief {
                    topic: topic.to_string(),
                    findings: format!(
                        "Research on {} is unavailable ({}). Please provide manual input.",
                        topic, e
                    ),
                    key_points: Vec::new(),
                    sources: Vec::new(),
                    timestamp: chrono::Utc::now().to_rfc3339(),
                }
            }
        }
    }

    fn assemble(&self, topic: &str, findings: &str, sources: Vec<String>) -> ResearchBrief {
        let compacted = truncate_chars(findings.trim(), self.context_chars).to_string();
        ResearchBrief {
            topic: topic.to_string(),
            key_points: extract_key_points(&compacted),
            findings: compacted,
            sources,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Bullet and numbered lines of the findings, markers stripped
pub(crate) fn extract_key_points(findings: &str) -> Vec<String> {
    findings
        .lines()
        .map(str::trim)
        .filter(|line| is_list_item(line))
        .map(|line| {
            line.trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['-', '*', '.'])
                .trim()
                .to_string()
        })
        .filter(|point| !point.is_empty())
        .take(MAX_KEY_POINTS)
        .collect()
}

fn grounded_prompt(topic: &str) -> String {
    format!(
        "You are a Research Agent specialized in gathering factual, up-to-date information.

Topic: {topic}

Your task:
1. Search for the latest information, trends, and data about this topic
2. Find credible sources and expert opinions
3. Identify key statistics, case studies, and examples
4. Look for different perspectives and angles
5. Compile a comprehensive research brief

Output your findings in a structured format with:
- Overview of the topic
- Key findings (5-7 main points, one per line starting with \"- \")
- Important statistics or data
- Notable sources and citations
- Interesting angles or perspectives to explore

Be thorough but concise. Focus on factual, verifiable information."
    )
}

fn fallback_prompt(topic: &str) -> String {
    format!(
        "Based on your training data, provide a research brief on: {topic}

Include:
- Overview and context
- 5-7 key points, one per line starting with \"- \"
- Important considerations
- Potential angles for a blog article

Be factual and note that this is based on training data, not real-time search."
    )
}
