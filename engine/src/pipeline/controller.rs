//! Pipeline Controller
//!
//! Sequences the stages of one run and owns its memory:
//!
//! ```text
//! Start → Researched → Drafted → Optimized → Reviewing(1)
//!   Reviewing(i) ── score ≥ threshold ─────────────→ Approved(i)
//!   Reviewing(i) ── i = max_iterations ────────────→ Approved(i, forced)
//!   Reviewing(i) ── otherwise → Revising(i) ───────→ Reviewing(i + 1)
//! Approved → Done
//! ```
//!
//! The controller never fails. Every stage degrades to fallback data, so a
//! run always ends in `Done` with an artifact.

use crate::config::PipelineConfig;
use crate::llm::Generator;
use crate::pipeline::memory::MemoryState;
use crate::pipeline::publish::{ArtifactMetadata, EditorialReport, PublishedArtifact};
use crate::pipeline::stages::{DraftStage, OptimizeStage, ResearchStage, ReviewStage};
use sdk::types::DraftText;
use serde::Serialize;
use tracing::Instrument;

/// Tunables for one pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub quality_threshold: f64,
    pub max_iterations: u32,
    pub review_context_chars: usize,
    pub research_context_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for PipelineSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            quality_threshold: config.quality_threshold,
            max_iterations: config.max_iterations,
            review_context_chars: config.review_context_chars,
            research_context_chars: config.research_context_chars,
        }
    }
}

/// Controller states, recorded in order for every run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineState {
    Start,
    Researched,
    Drafted,
    Optimized,
    Reviewing { iteration: u32 },
    Revising { iteration: u32 },
    Approved { iteration: u32, forced: bool },
    Done,
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub run_id: String,
    pub topic: String,
    pub artifact: PublishedArtifact,
    pub memory: MemoryState,
    pub transitions: Vec<PipelineState>,
}

pub struct PipelineController {
    research: ResearchStage,
    draft: DraftStage,
    optimize: OptimizeStage,
    review: ReviewStage,
    settings: PipelineSettings,
}

impl PipelineController {
    pub fn new(generator: Generator, settings: PipelineSettings) -> Self {
        Self {
            research: ResearchStage::new(generator.clone(), settings.research_context_chars),
            draft: DraftStage::new(generator.clone(), settings.quality_threshold),
            optimize: OptimizeStage::new(generator.clone()),
            review: ReviewStage::new(
                generator,
                settings.quality_threshold,
                settings.review_context_chars,
            ),
            settings,
        }
    }

    /// Run the full pipeline for `topic`
    pub async fn run(&self, topic: &str, style_guide: &str) -> PipelineRun {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("pipeline", run_id = %run_id, topic = %topic);

        self.run_inner(run_id.clone(), topic, style_guide)
            .instrument(span)
            .await
    }

    async fn run_inner(&self, run_id: String, topic: &str, style_guide: &str) -> PipelineRun {
        let max_iterations = self.settings.max_iterations.max(1);
        let mut memory = MemoryState::new(style_guide);
        let mut transitions = vec![PipelineState::Start];
        let mut state = PipelineState::Start;

        tracing::info!("Pipeline started (max_iterations={})", max_iterations);

        while !matches!(state, PipelineState::Approved { .. }) {
            state = match state {
                PipelineState::Start => {
                    let brief = self.research.run(topic).await;
                    memory.set_research(brief);
                    PipelineState::Researched
                }
                PipelineState::Researched => {
                    let draft = self.draft.write_initial(&memory).await;
                    memory.push_draft(draft);
                    PipelineState::Drafted
                }
                PipelineState::Drafted => {
                    let latest = memory.latest_draft().cloned().unwrap_or_else(|| DraftText::new(""));
                    let output = self.optimize.run(&latest, topic).await;
                    memory.set_seo(output.seo);
                    memory.push_draft(output.draft);
                    PipelineState::Optimized
                }
                PipelineState::Optimized => PipelineState::Reviewing { iteration: 1 },
                PipelineState::Reviewing { iteration } => {
                    let mut record = self.review.run(&memory, iteration).await;
                    let next = if record.approved {
                        PipelineState::Approved {
                            iteration,
                            forced: false,
                        }
                    } else if iteration >= max_iterations {
                        tracing::warn!(
                            "Iteration limit reached at score {:.1}; accepting current draft",
                            record.score
                        );
                        record.approved = true;
                        record.forced_approval = true;
                        PipelineState::Approved {
                            iteration,
                            forced: true,
                        }
                    } else {
                        PipelineState::Revising { iteration }
                    };
                    memory.push_feedback(record);
                    next
                }
                PipelineState::Revising { iteration } => {
                    if let Some(feedback) = memory.latest_feedback().cloned() {
                        if let Some(revised) = self.draft.revise(&memory, &feedback).await {
                            memory.push_draft(revised);
                        }
                    }
                    PipelineState::Reviewing {
                        iteration: iteration + 1,
                    }
                }
                PipelineState::Approved { .. } | PipelineState::Done => break,
            };

            tracing::info!("Pipeline state: {:?}", state);
            transitions.push(state);
        }

        let artifact = self.assemble(&memory, topic).await;
        transitions.push(PipelineState::Done);
        tracing::info!(
            "Pipeline done: {} drafts, {} reviews",
            memory.drafts().len(),
            memory.feedback_count()
        );

        PipelineRun {
            run_id,
            topic: topic.to_string(),
            artifact,
            memory,
            transitions,
        }
    }

    async fn assemble(&self, memory: &MemoryState, topic: &str) -> PublishedArtifact {
        let body = memory.latest_draft().cloned().unwrap_or_else(|| DraftText::new(""));
        let keywords = memory.seo().map(|s| s.keywords.clone()).unwrap_or_default();
        let meta = self.optimize.meta_tags(&body, &keywords, topic).await;

        let latest = memory.latest_feedback();
        let report = EditorialReport {
            iterations: memory.feedback_count(),
            final_score: latest.map(|f| f.score).unwrap_or(0.0),
            quality_threshold: self.settings.quality_threshold,
            forced_approval: latest.map(|f| f.forced_approval).unwrap_or(false),
            strengths: latest.map(|f| f.strengths.clone()).unwrap_or_default(),
            word_count: body.word_count(),
            has_structure: body.has_structure(),
            seo_optimized: memory.seo().is_some(),
        };

        PublishedArtifact {
            metadata: ArtifactMetadata {
                title: meta.title,
                description: meta.description,
                date: chrono::Local::now().format("%Y-%m-%d").to_string(),
                keywords,
                sources: memory
                    .research()
                    .map(|r| r.sources.clone())
                    .unwrap_or_default(),
            },
            body,
            report,
        }
    }
}
