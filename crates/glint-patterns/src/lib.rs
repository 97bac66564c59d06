//! # glint-patterns
//!
//! The learned layer of the engine: pattern storage with per-key
//! concurrency, the suppression rule, feedback processing, and full
//! rebuild from confirmed history.

pub mod feedback;
pub mod rebuild;
pub mod store;
pub mod suppression;

pub use feedback::{FeedbackManager, FeedbackOutcome};
pub use rebuild::{rebuild_patterns, RebuildReport};
pub use store::PatternStore;
pub use suppression::should_suppress;
