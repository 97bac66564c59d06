use serde::{Deserialize, Serialize};

use super::defaults;

/// Semantic-tier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Dimensionality every stored and queried vector must have.
    pub dimensions: usize,
    /// Cosine similarity at or above this counts as a semantic match.
    pub match_threshold: f64,
    /// Maximum entries in the in-memory embedding cache.
    pub embed_cache_capacity: u64,
    /// Time-to-live for cached embeddings, in seconds.
    pub embed_cache_ttl_secs: u64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            match_threshold: defaults::DEFAULT_MATCH_THRESHOLD,
            embed_cache_capacity: defaults::DEFAULT_EMBED_CACHE_CAPACITY,
            embed_cache_ttl_secs: defaults::DEFAULT_EMBED_CACHE_TTL_SECS,
        }
    }
}
