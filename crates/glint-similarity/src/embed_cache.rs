//! In-memory embedding cache using moka.
//!
//! Keys are blake3 hashes of the normalized text, so the same vendor key
//! never pays for a second embedding call within the TTL.

use std::time::Duration;

use moka::sync::Cache;

/// Text-to-vector cache.
pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    /// Create a cache holding up to `capacity` vectors for `ttl` each.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    fn hash(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Get a cached vector for a text.
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        self.cache.get(&Self::hash(text))
    }

    /// Cache a vector for a text.
    pub fn insert(&self, text: &str, vector: Vec<f32>) {
        self.cache.insert(Self::hash(text), vector);
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalidate all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
