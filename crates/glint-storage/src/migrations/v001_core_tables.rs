//! v001: patterns, feedback_events, history_entries, embeddings.

use rusqlite::Connection;

use glint_core::errors::GlintResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> GlintResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS patterns (
            key              TEXT PRIMARY KEY,
            gl_code          TEXT NOT NULL,
            average_amount   REAL NOT NULL,
            occurrence_count INTEGER NOT NULL DEFAULT 1,
            confirm_count    INTEGER NOT NULL DEFAULT 0,
            reject_count     INTEGER NOT NULL DEFAULT 0,
            suppressed       INTEGER NOT NULL DEFAULT 0,
            manual_override  INTEGER NOT NULL DEFAULT 0,
            reactivated_at   TEXT,
            created_at       TEXT NOT NULL,
            last_updated     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_patterns_suppressed ON patterns(suppressed);

        CREATE TABLE IF NOT EXISTS feedback_events (
            id                TEXT PRIMARY KEY,
            key               TEXT NOT NULL,
            predicted_gl_code TEXT NOT NULL,
            actual_gl_code    TEXT NOT NULL,
            kind              TEXT NOT NULL,
            recorded_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_feedback_key ON feedback_events(key);
        CREATE INDEX IF NOT EXISTS idx_feedback_recorded ON feedback_events(recorded_at);

        CREATE TABLE IF NOT EXISTS history_entries (
            id          TEXT PRIMARY KEY,
            key         TEXT NOT NULL,
            description TEXT NOT NULL,
            amount      REAL NOT NULL,
            gl_code     TEXT NOT NULL,
            confirmed   INTEGER NOT NULL DEFAULT 0,
            recorded_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_key ON history_entries(key);
        CREATE INDEX IF NOT EXISTS idx_history_confirmed ON history_entries(confirmed);

        CREATE TABLE IF NOT EXISTS embeddings (
            id         TEXT PRIMARY KEY,
            key        TEXT NOT NULL UNIQUE,
            gl_code    TEXT NOT NULL,
            vector     BLOB NOT NULL,
            created_at TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
