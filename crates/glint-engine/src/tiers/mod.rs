//! The three resolution tiers, cheapest first.
//!
//! Each tier either answers with a [`glint_core::TierResolution`] or
//! reports a miss; the engine walks them in order and stops at the
//! first answer.

pub mod exact;
pub mod remote;
pub mod semantic;

pub use exact::ExactTier;
pub use remote::RemoteTier;
pub use semantic::SemanticTier;
