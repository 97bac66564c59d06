//! Tier 2: nearest-key lookup over the embedding index.

use std::sync::Arc;

use tracing::{debug, warn};

use glint_core::errors::{GlintError, SimilarityError};
use glint_core::models::{Score, TierKind, TierResolution};
use glint_core::GlintResult;
use glint_patterns::PatternStore;
use glint_similarity::SimilarityEngine;

/// Semantic-match tier.
///
/// Asks the similarity engine for the nearest indexed key above the
/// match threshold, then serves that neighbor's live pattern. The
/// embedding record remembers the code it was confirmed under; the
/// pattern is the current mapping, so the pattern's code wins.
pub struct SemanticTier {
    similarity: Arc<SimilarityEngine>,
    patterns: Arc<PatternStore>,
}

impl SemanticTier {
    pub fn new(similarity: Arc<SimilarityEngine>, patterns: Arc<PatternStore>) -> Self {
        Self {
            similarity,
            patterns,
        }
    }

    /// Resolve `key`, or report a miss.
    ///
    /// An unavailable embedding provider is a miss, the next tier can
    /// still answer. A match pointing at a key with no pattern, or a
    /// vector of the wrong width, is a data inconsistency and fails
    /// the request.
    pub async fn resolve(&self, key: &str) -> GlintResult<Option<TierResolution>> {
        let hit = match self.similarity.match_key(key).await {
            Ok(hit) => hit,
            Err(e @ GlintError::SimilarityError(SimilarityError::DimensionMismatch { .. })) => {
                return Err(e);
            }
            Err(e) => {
                warn!(key, error = %e, "embedder unavailable, semantic tier misses");
                return Ok(None);
            }
        };
        let Some(hit) = hit else {
            return Ok(None);
        };

        let Some(pattern) = self.patterns.get(&hit.key) else {
            return Err(GlintError::DataInconsistency {
                message: format!("embedding index points at key '{}' with no pattern", hit.key),
            });
        };
        if pattern.suppressed {
            debug!(key, matched = %hit.key, "nearest pattern suppressed, semantic tier misses");
            return Ok(None);
        }

        debug!(
            key,
            matched = %hit.key,
            similarity = hit.similarity,
            "semantic tier matched"
        );
        Ok(Some(TierResolution {
            gl_code: pattern.gl_code,
            score: Score::new(f64::from(hit.similarity)),
            source: TierKind::Semantic,
            matched_key: Some(hit.key),
        }))
    }
}
