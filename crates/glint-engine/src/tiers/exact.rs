//! Tier 1: exact key lookup against the pattern store.

use std::sync::Arc;

use tracing::debug;

use glint_core::config::PolicyConfig;
use glint_core::models::{Score, TierKind, TierResolution};
use glint_patterns::PatternStore;

/// Exact-match tier.
///
/// A non-suppressed pattern for the key is a hit; its score is the
/// pattern's feedback accuracy, or the configured bootstrap score before
/// any feedback exists. Suppressed and absent patterns are misses.
pub struct ExactTier {
    patterns: Arc<PatternStore>,
    bootstrap_score: f64,
}

impl ExactTier {
    pub fn new(patterns: Arc<PatternStore>, policy: &PolicyConfig) -> Self {
        Self {
            patterns,
            bootstrap_score: policy.bootstrap_score,
        }
    }

    /// Resolve `key`, or report a miss.
    pub fn resolve(&self, key: &str) -> Option<TierResolution> {
        let pattern = self.patterns.get(key)?;
        if pattern.suppressed {
            debug!(key, "suppressed pattern treated as exact-tier miss");
            return None;
        }

        let score = pattern.accuracy().unwrap_or(self.bootstrap_score);
        Some(TierResolution {
            gl_code: pattern.gl_code,
            score: Score::new(score),
            source: TierKind::Exact,
            matched_key: None,
        })
    }
}
