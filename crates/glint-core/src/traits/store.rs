use chrono::{DateTime, Utc};

use crate::errors::GlintResult;
use crate::models::{EmbeddingRecord, FeedbackEvent, HistoryEntry, Pattern, TierUsageRecord};

/// Durable storage behind the engine: patterns + feedback log + history +
/// embeddings + usage. One seam, so a single SQLite file can back all of it.
pub trait IExpenseStore: Send + Sync {
    // --- Patterns ---
    fn save_pattern(&self, pattern: &Pattern) -> GlintResult<()>;
    fn load_patterns(&self) -> GlintResult<Vec<Pattern>>;
    fn delete_pattern(&self, key: &str) -> GlintResult<bool>;
    /// Atomically swap the whole pattern set, used by rebuild.
    fn replace_patterns(&self, patterns: &[Pattern]) -> GlintResult<()>;

    // --- Feedback log (append-only, replayed on rebuild) ---
    fn append_feedback(&self, event: &FeedbackEvent) -> GlintResult<()>;
    fn load_feedback(&self) -> GlintResult<Vec<FeedbackEvent>>;

    // --- History ---
    fn append_history(&self, entry: &HistoryEntry) -> GlintResult<()>;
    /// Confirm unconfirmed entries matching (key, gl_code). Returns how many
    /// rows changed.
    fn confirm_history(&self, key: &str, gl_code: &str) -> GlintResult<u64>;
    /// Rewrite unconfirmed entries for (key, predicted) to the corrected
    /// code and confirm them. Returns how many rows changed.
    fn correct_history(&self, key: &str, predicted: &str, actual: &str) -> GlintResult<u64>;
    fn confirmed_history(&self) -> GlintResult<Vec<HistoryEntry>>;

    // --- Embeddings ---
    fn save_embedding(&self, record: &EmbeddingRecord) -> GlintResult<()>;
    fn load_embeddings(&self) -> GlintResult<Vec<EmbeddingRecord>>;
    /// Atomically swap the whole embedding set, used by rebuild.
    fn replace_embeddings(&self, records: &[EmbeddingRecord]) -> GlintResult<()>;

    // --- Usage ---
    fn append_usage(&self, record: &TierUsageRecord) -> GlintResult<()>;
    fn usage_since(&self, cutoff: DateTime<Utc>) -> GlintResult<Vec<TierUsageRecord>>;
}
