//! Pipeline Memory
//!
//! State owned by a single pipeline run: the style guide, the research brief,
//! the ordered draft history, the latest SEO record and the ordered feedback
//! history. Draft and feedback histories are append-only. The controller is
//! the only writer; stages receive `&MemoryState`.

use sdk::types::{DraftText, FeedbackRecord, ResearchBrief, SeoRecord};
use serde::Serialize;

/// Shared state threaded between the stages of one run
#[derive(Debug, Clone, Serialize)]
pub struct MemoryState {
    style_guide: String,
    research: Option<ResearchBrief>,
    drafts: Vec<DraftText>,
    seo: Option<SeoRecord>,
    feedback: Vec<FeedbackRecord>,
}

impl MemoryState {
    /// Fresh memory holding only the style guide
    pub fn new(style_guide: impl Into<String>) -> Self {
        Self {
            style_guide: style_guide.into(),
            research: None,
            drafts: Vec::new(),
            seo: None,
            feedback: Vec::new(),
        }
    }

    pub fn style_guide(&self) -> &str {
        &self.style_guide
    }

    /// Store the research brief. The first brief wins; later ones are ignored.
    pub fn set_research(&mut self, brief: ResearchBrief) {
        if self.research.is_some() {
            tracing::warn!("Research brief already stored; ignoring replacement");
            return;
        }
        self.research = Some(brief);
    }

    pub fn research(&self) -> Option<&ResearchBrief> {
        self.research.as_ref()
    }

    pub fn push_draft(&mut self, draft: DraftText) {
        self.drafts.push(draft);
    }

    pub fn drafts(&self) -> &[DraftText] {
        &self.drafts
    }

    pub fn latest_draft(&self) -> Option<&DraftText> {
        self.drafts.last()
    }

    /// SEO data is replaced, not accumulated
    pub fn set_seo(&mut self, seo: SeoRecord) {
        self.seo = Some(seo);
    }

    pub fn seo(&self) -> Option<&SeoRecord> {
        self.seo.as_ref()
    }

    pub fn push_feedback(&mut self, record: FeedbackRecord) {
        self.feedback.push(record);
    }

    pub fn feedback_history(&self) -> &[FeedbackRecord] {
        &self.feedback
    }

    pub fn latest_feedback(&self) -> Option<&FeedbackRecord> {
        self.feedback.last()
    }

    pub fn feedback_count(&self) -> usize {
        self.feedback.len()
    }
}
