//! Criterion benchmarks for glint-similarity.
//!
//! Covers the hot Tier 2 path: cosine scoring, normalization, index
//! scans at realistic store sizes, and embedding cache hits.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use glint_core::models::EmbeddingRecord;
use glint_similarity::{cosine_similarity, unit_normalize, EmbeddingCache, VectorIndex};

const DIMS: usize = 1536;

/// Helper: deterministic pseudo-random vector, no rand dependency.
fn synthetic_vector(seed: u64, dimensions: usize) -> Vec<f32> {
    let mut state = seed.wrapping_mul(0x9e37_79b9_7f4a_7c15).max(1);
    (0..dimensions)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 1_000) as f32 / 1_000.0
        })
        .collect()
}

fn populated_index(records: usize) -> VectorIndex {
    let index = VectorIndex::new(DIMS);
    for i in 0..records {
        let record = EmbeddingRecord::new(
            format!("vendor-{i}"),
            format!("{:04}-Expense", 6000 + (i % 900)),
            synthetic_vector(i as u64 + 1, DIMS),
        );
        index.insert(record).unwrap();
    }
    index
}

fn bench_cosine_similarity(c: &mut Criterion) {
    let a = unit_normalize(synthetic_vector(1, DIMS));
    let b = unit_normalize(synthetic_vector(2, DIMS));

    c.bench_function("cosine_similarity_1536", |bench| {
        bench.iter(|| cosine_similarity(&a, &b));
    });
}

fn bench_unit_normalize(c: &mut Criterion) {
    let v = synthetic_vector(3, DIMS);

    c.bench_function("unit_normalize_1536", |bench| {
        bench.iter(|| unit_normalize(v.clone()));
    });
}

fn bench_index_search_1k(c: &mut Criterion) {
    let index = populated_index(1_000);
    let query = unit_normalize(synthetic_vector(42, DIMS));

    c.bench_function("index_search_1k_records", |bench| {
        bench.iter(|| index.search(&query, 0.85, 5).unwrap());
    });
}

fn bench_index_search_10k(c: &mut Criterion) {
    let index = populated_index(10_000);
    let query = unit_normalize(synthetic_vector(42, DIMS));

    c.bench_function("index_search_10k_records", |bench| {
        bench.iter(|| index.search(&query, 0.85, 5).unwrap());
    });
}

fn bench_embed_cache_hit(c: &mut Criterion) {
    let cache = EmbeddingCache::new(10_000, Duration::from_secs(3_600));
    cache.insert("starbucks", unit_normalize(synthetic_vector(7, DIMS)));

    c.bench_function("embed_cache_hit", |bench| {
        bench.iter(|| cache.get("starbucks").unwrap());
    });
}

criterion_group!(
    benches,
    bench_cosine_similarity,
    bench_unit_normalize,
    bench_index_search_1k,
    bench_index_search_10k,
    bench_embed_cache_hit,
);
criterion_main!(benches);
