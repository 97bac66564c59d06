use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored vector for one confirmed key, served by the semantic tier.
///
/// Vectors are unit-normalized before storage so cosine similarity reduces
/// to a dot product at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// UUID v4 identifier.
    pub id: Uuid,
    /// Normalized key the vector was computed from.
    pub key: String,
    /// GL code confirmed for the key at embedding time.
    pub gl_code: String,
    /// Unit-normalized embedding vector.
    pub vector: Vec<f32>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl EmbeddingRecord {
    pub fn new(key: impl Into<String>, gl_code: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            gl_code: gl_code.into(),
            vector,
            created_at: Utc::now(),
        }
    }
}
