//! # glint-similarity
//!
//! The semantic tier's machinery: vector math over unit-normalized
//! embeddings, a brute-force cosine index, an in-memory embedding cache,
//! and a deterministic hashing embedder for tests and air-gapped runs.

pub mod embed_cache;
pub mod engine;
pub mod hash_embedder;
pub mod index;
pub mod vector;

pub use embed_cache::EmbeddingCache;
pub use engine::SimilarityEngine;
pub use hash_embedder::HashEmbedder;
pub use index::{SemanticMatch, VectorIndex};
pub use vector::{cosine_similarity, dot, norm, unit_normalize};
