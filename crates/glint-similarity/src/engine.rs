//! SimilarityEngine: the main entry point for glint-similarity.
//!
//! Coordinates the embedding provider, the write-through embedding
//! cache, and the in-memory vector index behind a single interface.
//! Tier 2 lookups go through [`SimilarityEngine::match_key`].

use std::sync::Arc;
use std::time::Duration;

use glint_core::config::SimilarityConfig;
use glint_core::errors::{GlintResult, SimilarityError};
use glint_core::models::EmbeddingRecord;
use glint_core::traits::IEmbedder;
use tracing::{debug, info};

use crate::embed_cache::EmbeddingCache;
use crate::index::{SemanticMatch, VectorIndex};
use crate::vector::unit_normalize;

/// Embedding, caching, and nearest-key lookup in one place.
///
/// Vectors are unit-normalized before they enter the cache or the
/// index, so cosine scores compare consistently no matter which
/// provider produced them.
pub struct SimilarityEngine {
    embedder: Arc<dyn IEmbedder>,
    cache: EmbeddingCache,
    index: VectorIndex,
    config: SimilarityConfig,
}

impl SimilarityEngine {
    /// Create an engine around `embedder`.
    ///
    /// Fails if the provider's output width does not match the
    /// configured dimensions; every downstream comparison assumes a
    /// single width.
    pub fn new(embedder: Arc<dyn IEmbedder>, config: SimilarityConfig) -> GlintResult<Self> {
        if embedder.dimensions() != config.dimensions {
            return Err(SimilarityError::DimensionMismatch {
                expected: config.dimensions,
                actual: embedder.dimensions(),
            }
            .into());
        }

        let cache = EmbeddingCache::new(
            config.embed_cache_capacity,
            Duration::from_secs(config.embed_cache_ttl_secs),
        );
        let index = VectorIndex::new(config.dimensions);

        info!(
            provider = embedder.name(),
            dims = config.dimensions,
            threshold = config.match_threshold,
            "SimilarityEngine initialized"
        );

        Ok(Self {
            embedder,
            cache,
            index,
            config,
        })
    }

    /// Embed `text`, serving repeats from the cache.
    ///
    /// The cache holds normalized vectors, so hits skip both the
    /// provider call and the normalization pass.
    pub async fn embed_cached(&self, text: &str) -> GlintResult<Vec<f32>> {
        if let Some(vector) = self.cache.get(text) {
            debug!(provider = self.embedder.name(), "embedding cache hit");
            return Ok(vector);
        }

        let raw = self.embedder.embed(text).await?;
        if raw.len() != self.config.dimensions {
            return Err(SimilarityError::DimensionMismatch {
                expected: self.config.dimensions,
                actual: raw.len(),
            }
            .into());
        }

        let vector = unit_normalize(raw);
        self.cache.insert(text, vector.clone());
        Ok(vector)
    }

    /// Find the closest indexed key to `key`, if any clears the
    /// configured match threshold.
    pub async fn match_key(&self, key: &str) -> GlintResult<Option<SemanticMatch>> {
        let query = self.embed_cached(key).await?;
        let mut matches = self
            .index
            .search(&query, self.config.match_threshold as f32, 1)?;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.remove(0))
        })
    }

    /// Embed `key` and add it to the index under `gl_code`.
    ///
    /// Returns the stored record so callers can persist it. Indexing
    /// the same key again replaces its previous vector.
    pub async fn index_key(&self, key: &str, gl_code: &str) -> GlintResult<EmbeddingRecord> {
        let vector = self.embed_cached(key).await?;
        let record = EmbeddingRecord::new(key, gl_code, vector);
        self.index.insert(record.clone())?;
        Ok(record)
    }

    /// Swap the index contents for `records`, dropping anything that
    /// was there before. Returns how many records were kept.
    pub fn load_records(&self, records: Vec<EmbeddingRecord>) -> usize {
        self.index.replace_all(records)
    }

    /// Current index contents, for persistence.
    pub fn snapshot(&self) -> Vec<EmbeddingRecord> {
        self.index.snapshot()
    }

    /// Number of keys currently indexed.
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// Configured vector width.
    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}
