//! History log: append, confirm, correct, and the confirmed-only scan
//! that rebuild runs on.

use rusqlite::{params, Connection};
use uuid::Uuid;

use glint_core::errors::GlintResult;
use glint_core::models::HistoryEntry;

use super::pattern_ops::parse_dt;
use crate::to_storage_err;

/// Append one history entry.
pub fn append_history(conn: &Connection, entry: &HistoryEntry) -> GlintResult<()> {
    conn.execute(
        "INSERT INTO history_entries (
            id, key, description, amount, gl_code, confirmed, recorded_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.id.to_string(),
            entry.key,
            entry.description,
            entry.amount,
            entry.gl_code,
            entry.confirmed as i32,
            entry.recorded_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Mark unconfirmed entries matching (key, gl_code) as confirmed.
pub fn confirm_history(conn: &Connection, key: &str, gl_code: &str) -> GlintResult<u64> {
    let rows = conn
        .execute(
            "UPDATE history_entries SET confirmed = 1
             WHERE key = ?1 AND gl_code = ?2 AND confirmed = 0",
            params![key, gl_code],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows as u64)
}

/// Rewrite unconfirmed entries for (key, predicted) to the corrected
/// code and confirm them in one pass.
pub fn correct_history(
    conn: &Connection,
    key: &str,
    predicted: &str,
    actual: &str,
) -> GlintResult<u64> {
    let rows = conn
        .execute(
            "UPDATE history_entries SET gl_code = ?3, confirmed = 1
             WHERE key = ?1 AND gl_code = ?2 AND confirmed = 0",
            params![key, predicted, actual],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows as u64)
}

/// Load every confirmed entry, oldest first.
pub fn confirmed_history(conn: &Connection) -> GlintResult<Vec<HistoryEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, key, description, amount, gl_code, confirmed, recorded_at
             FROM history_entries WHERE confirmed = 1 ORDER BY recorded_at",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| Ok(row_to_entry(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(entries)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> GlintResult<HistoryEntry> {
    let id_str: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let recorded_str: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(HistoryEntry {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| to_storage_err(format!("parse history id '{id_str}': {e}")))?,
        key: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        description: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        amount: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        gl_code: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        confirmed: row
            .get::<_, i32>(5)
            .map_err(|e| to_storage_err(e.to_string()))?
            != 0,
        recorded_at: parse_dt(&recorded_str)?,
    })
}
