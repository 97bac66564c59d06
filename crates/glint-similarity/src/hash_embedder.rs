//! Deterministic hashing embedder.
//!
//! Buckets FNV-1a token hashes into a fixed-dimension vector and
//! L2-normalizes. No model, no network, fully reproducible; the stand-in
//! embedder for tests and environments without an embedding service.

use async_trait::async_trait;

use glint_core::traits::IEmbedder;
use glint_core::GlintResult;

use crate::vector::unit_normalize;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hashing bag-of-tokens embedder.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_term(term: &str) -> u64 {
        let mut hash = FNV_OFFSET;
        for byte in term.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text.split_whitespace() {
            let bucket = (Self::hash_term(token) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        // A token-free text yields the zero vector, which normalization
        // turns into the uniform unit vector.
        unit_normalize(vector)
    }
}

#[async_trait]
impl IEmbedder for HashEmbedder {
    async fn embed(&self, text: &str) -> GlintResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hash"
    }
}
