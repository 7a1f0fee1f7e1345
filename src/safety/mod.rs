//! Safety net building blocks: shortcut proposals and danger/safety scoring.

pub mod scorer;
pub mod shortcut;

pub use scorer::{SafetyScorer, StateFeatures};
pub use shortcut::ShortcutPlanner;
