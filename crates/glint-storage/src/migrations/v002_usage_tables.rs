//! v002: usage_records.

use rusqlite::Connection;

use glint_core::errors::GlintResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> GlintResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS usage_records (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            tier        TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            latency_ms  REAL NOT NULL,
            cost_units  REAL NOT NULL,
            success     INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_usage_recorded ON usage_records(recorded_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
