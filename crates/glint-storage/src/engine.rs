//! StorageEngine: owns the connection pool, runs migrations on open,
//! and implements `IExpenseStore`.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use glint_core::errors::GlintResult;
use glint_core::models::{EmbeddingRecord, FeedbackEvent, HistoryEntry, Pattern, TierUsageRecord};
use glint_core::traits::IExpenseStore;

use crate::migrations;
use crate::pool::{ConnectionPool, ReadPool};
use crate::queries;

/// The main storage engine. Owns the connection pool and provides the
/// full `IExpenseStore` interface over one SQLite file.
pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> GlintResult<Self> {
        let pool = ConnectionPool::open(path, ReadPool::default_size())?;
        let engine = Self { pool };
        engine.initialize()?;
        info!(path = %path.display(), "storage engine opened");
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing). All reads go
    /// through the writer; see [`ConnectionPool::open_in_memory`].
    pub fn open_in_memory() -> GlintResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self { pool };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations on the write connection.
    fn initialize(&self) -> GlintResult<()> {
        self.pool
            .writer
            .with_conn_sync(migrations::run_migrations)
    }

    /// Current schema version.
    pub fn schema_version(&self) -> GlintResult<u32> {
        self.pool.writer.with_conn_sync(migrations::schema_version)
    }

    /// Get a reference to the connection pool (for maintenance).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Run a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> GlintResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> GlintResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn_sync(f),
        }
    }
}

impl IExpenseStore for StorageEngine {
    fn save_pattern(&self, pattern: &Pattern) -> GlintResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::pattern_ops::upsert_pattern(conn, pattern))
    }

    fn load_patterns(&self) -> GlintResult<Vec<Pattern>> {
        self.with_reader(queries::pattern_ops::load_patterns)
    }

    fn delete_pattern(&self, key: &str) -> GlintResult<bool> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::pattern_ops::delete_pattern(conn, key))
    }

    fn replace_patterns(&self, patterns: &[Pattern]) -> GlintResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::pattern_ops::replace_patterns(conn, patterns))
    }

    fn append_feedback(&self, event: &FeedbackEvent) -> GlintResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::feedback_ops::append_feedback(conn, event))
    }

    fn load_feedback(&self) -> GlintResult<Vec<FeedbackEvent>> {
        self.with_reader(queries::feedback_ops::load_feedback)
    }

    fn append_history(&self, entry: &HistoryEntry) -> GlintResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::history_ops::append_history(conn, entry))
    }

    fn confirm_history(&self, key: &str, gl_code: &str) -> GlintResult<u64> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::history_ops::confirm_history(conn, key, gl_code))
    }

    fn correct_history(&self, key: &str, predicted: &str, actual: &str) -> GlintResult<u64> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::history_ops::correct_history(conn, key, predicted, actual)
        })
    }

    fn confirmed_history(&self) -> GlintResult<Vec<HistoryEntry>> {
        self.with_reader(queries::history_ops::confirmed_history)
    }

    fn save_embedding(&self, record: &EmbeddingRecord) -> GlintResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::embedding_ops::save_embedding(conn, record))
    }

    fn load_embeddings(&self) -> GlintResult<Vec<EmbeddingRecord>> {
        self.with_reader(queries::embedding_ops::load_embeddings)
    }

    fn replace_embeddings(&self, records: &[EmbeddingRecord]) -> GlintResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::embedding_ops::replace_embeddings(conn, records))
    }

    fn append_usage(&self, record: &TierUsageRecord) -> GlintResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::usage_ops::append_usage(conn, record))
    }

    fn usage_since(&self, cutoff: DateTime<Utc>) -> GlintResult<Vec<TierUsageRecord>> {
        self.with_reader(|conn| queries::usage_ops::usage_since(conn, cutoff))
    }
}
