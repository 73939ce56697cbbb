//! Pipeline stages
//!
//! Each stage reads the run's memory, calls the generator, and returns a
//! value for the controller to store. No stage returns an error: generation
//! failures degrade to fallback data and are logged at `warn`.

pub mod draft;
pub mod optimize;
pub mod research;
pub mod review;

pub use draft::DraftStage;
pub use optimize::{OptimizeOutput, OptimizeStage};
pub use research::ResearchStage;
pub use review::ReviewStage;

/// Render items as a dash list, one per line
pub(crate) fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
