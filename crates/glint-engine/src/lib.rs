//! # glint-engine
//!
//! The tiered categorization pipeline behind one facade:
//!
//! - Tier 1 ([`tiers::exact`]): exact key lookup in the pattern store
//! - Tier 2 ([`tiers::semantic`]): cosine nearest-key over embeddings
//! - Tier 3 ([`tiers::remote`]): remote classification with resilience
//!
//! [`CategorizationEngine`] walks the tiers cheapest-first, applies the
//! decision policy to whatever answered, and feeds every resolution
//! back into the pattern store so the cheap tiers answer more of the
//! traffic over time.

pub mod engine;
pub mod policy;
pub mod singleflight;
pub mod tiers;

pub use engine::{CategorizationEngine, WarmReport};
