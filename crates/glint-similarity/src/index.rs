//! Brute-force cosine index over stored embedding records.
//!
//! Linear scan, parallelized with rayon. At the scale this engine serves
//! (one record per confirmed vendor key) exact scan beats approximate
//! structures on both simplicity and recall.

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use glint_core::errors::SimilarityError;
use glint_core::models::EmbeddingRecord;
use glint_core::GlintResult;

use crate::vector::{cosine_similarity, unit_normalize};

/// One hit from a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticMatch {
    /// Stored key whose vector matched.
    pub key: String,
    /// GL code on the matching record.
    pub gl_code: String,
    /// Cosine similarity against the query.
    pub similarity: f32,
}

/// In-memory vector index, one record per key.
pub struct VectorIndex {
    dimensions: usize,
    records: RwLock<Vec<EmbeddingRecord>>,
}

impl VectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Insert a record, normalizing its vector. A record for the same key
    /// is replaced: keys are re-embedded when their code changes, and the
    /// newest confirmation wins.
    pub fn insert(&self, mut record: EmbeddingRecord) -> GlintResult<()> {
        if record.vector.len() != self.dimensions {
            return Err(SimilarityError::DimensionMismatch {
                expected: self.dimensions,
                actual: record.vector.len(),
            }
            .into());
        }
        record.vector = unit_normalize(record.vector);
        let mut records = self.records.write();
        if let Some(existing) = records.iter_mut().find(|r| r.key == record.key) {
            *existing = record;
        } else {
            records.push(record);
        }
        Ok(())
    }

    /// Swap in a whole record set, e.g. hydrated from storage or produced
    /// by rebuild. Records with the wrong dimensionality are skipped and
    /// logged rather than failing the load. Returns how many were kept.
    pub fn replace_all(&self, records: Vec<EmbeddingRecord>) -> usize {
        let mut accepted = Vec::with_capacity(records.len());
        for mut record in records {
            if record.vector.len() != self.dimensions {
                warn!(
                    key = %record.key,
                    expected = self.dimensions,
                    actual = record.vector.len(),
                    "skipping embedding record with wrong dimensions"
                );
                continue;
            }
            record.vector = unit_normalize(record.vector);
            accepted.push(record);
        }
        let count = accepted.len();
        *self.records.write() = accepted;
        count
    }

    /// Matches at or above `threshold`, best first, at most `limit`.
    pub fn search(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> GlintResult<Vec<SemanticMatch>> {
        if query.len() != self.dimensions {
            return Err(SimilarityError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            }
            .into());
        }
        let query = unit_normalize(query.to_vec());
        let records = self.records.read();
        let mut scored: Vec<SemanticMatch> = records
            .par_iter()
            .filter_map(|record| {
                let similarity = cosine_similarity(&query, &record.vector);
                (similarity >= threshold).then(|| SemanticMatch {
                    key: record.key.clone(),
                    gl_code: record.gl_code.clone(),
                    similarity,
                })
            })
            .collect();
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        Ok(scored)
    }

    /// Cloned snapshot of all records, for persistence.
    pub fn snapshot(&self) -> Vec<EmbeddingRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
