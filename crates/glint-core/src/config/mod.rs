//! Per-subsystem configuration, aggregated by [`GlintConfig`].
//!
//! Every policy number in the engine lives here with its default in the
//! [`defaults`] module; TOML files override fields individually.

pub mod defaults;
pub mod policy_config;
pub mod remote_config;
pub mod resilience_config;
pub mod similarity_config;
pub mod suppression_config;
pub mod usage_config;

pub use policy_config::PolicyConfig;
pub use remote_config::RemoteConfig;
pub use resilience_config::ResilienceConfig;
pub use similarity_config::SimilarityConfig;
pub use suppression_config::SuppressionConfig;
pub use usage_config::UsageConfig;

use serde::{Deserialize, Serialize};

use crate::errors::GlintResult;

/// Top-level configuration for the whole engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlintConfig {
    pub suppression: SuppressionConfig,
    pub similarity: SimilarityConfig,
    pub resilience: ResilienceConfig,
    pub policy: PolicyConfig,
    pub usage: UsageConfig,
    pub remote: RemoteConfig,
}

impl GlintConfig {
    /// Parse a TOML document; missing sections and fields fall back to
    /// defaults, so `""` yields the full default configuration.
    pub fn from_toml(input: &str) -> GlintResult<Self> {
        Ok(toml::from_str(input)?)
    }
}
