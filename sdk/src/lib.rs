//! BlogFlow SDK
//!
//! Shared library providing the pipeline data model and error types.
//! This crate is used by the engine and by anything that consumes its output.

/// Error types and handling
pub mod errors;

/// Pipeline record types
pub mod types;

// Re-export commonly used types
pub use errors::{BlogflowErrorExt, EngineError};
pub use types::{DraftText, FeedbackRecord, MetaTags, ResearchBrief, SeoRecord};
