//! Content Pipeline
//!
//! Research → Draft → Optimize → Review, with a bounded Review ↔ Revise
//! loop. Stages only read [`MemoryState`]; the [`PipelineController`] is
//! the single writer.

pub mod controller;
pub mod feedback;
pub mod memory;
pub mod publish;
pub mod quality;
pub mod stages;

pub use controller::{PipelineController, PipelineRun, PipelineSettings, PipelineState};
pub use feedback::{FeedbackParser, ParsedReview};
pub use memory::MemoryState;
pub use publish::{
    sanitize_filename, write_artifact, ArtifactMetadata, EditorialReport, PublishedArtifact,
    DEFAULT_STYLE_GUIDE,
};
pub use quality::QualityScorer;
