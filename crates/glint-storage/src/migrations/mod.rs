//! Schema migrations, keyed off SQLite's `user_version`.

pub mod v001_core_tables;
pub mod v002_usage_tables;

use rusqlite::Connection;
use tracing::info;

use glint_core::errors::{GlintResult, StoreError};

use crate::to_storage_err;

/// Migrations in order. Each entry bumps `user_version` to its number.
const MIGRATIONS: &[(u32, fn(&Connection) -> GlintResult<()>)] = &[
    (1, v001_core_tables::migrate),
    (2, v002_usage_tables::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the database's current version.
pub fn run_migrations(conn: &Connection) -> GlintResult<()> {
    let current = schema_version(conn)?;
    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| StoreError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| to_storage_err(e.to_string()))?;
        info!(version, "applied schema migration");
    }
    Ok(())
}

/// Read the database's current `user_version`.
pub fn schema_version(conn: &Connection) -> GlintResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}
