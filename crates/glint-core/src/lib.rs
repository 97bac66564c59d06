//! # glint-core
//!
//! Foundation crate for the Glint expense-categorization engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::GlintConfig;
pub use errors::{GlintError, GlintResult};
pub use models::{
    CategorizationAction, CategorizationOutcome, Classification, ConfidenceBand, Pattern, Score,
    TierKind, TierResolution,
};
pub use normalize::{normalize, NormalizedKey};
