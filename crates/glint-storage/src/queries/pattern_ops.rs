//! Upsert, load, delete, and bulk replace for patterns.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use glint_core::errors::GlintResult;
use glint_core::models::Pattern;

use crate::to_storage_err;

/// Insert or overwrite the pattern row for its key.
pub fn upsert_pattern(conn: &Connection, pattern: &Pattern) -> GlintResult<()> {
    conn.execute(
        "INSERT INTO patterns (
            key, gl_code, average_amount, occurrence_count, confirm_count,
            reject_count, suppressed, manual_override, reactivated_at,
            created_at, last_updated
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(key) DO UPDATE SET
            gl_code = excluded.gl_code,
            average_amount = excluded.average_amount,
            occurrence_count = excluded.occurrence_count,
            confirm_count = excluded.confirm_count,
            reject_count = excluded.reject_count,
            suppressed = excluded.suppressed,
            manual_override = excluded.manual_override,
            reactivated_at = excluded.reactivated_at,
            last_updated = excluded.last_updated",
        params![
            pattern.key,
            pattern.gl_code,
            pattern.average_amount,
            pattern.occurrence_count,
            pattern.confirm_count,
            pattern.reject_count,
            pattern.suppressed as i32,
            pattern.manual_override as i32,
            pattern.reactivated_at.map(|t| t.to_rfc3339()),
            pattern.created_at.to_rfc3339(),
            pattern.last_updated.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Load every pattern, keyed order.
pub fn load_patterns(conn: &Connection) -> GlintResult<Vec<Pattern>> {
    let mut stmt = conn
        .prepare(
            "SELECT key, gl_code, average_amount, occurrence_count, confirm_count,
                    reject_count, suppressed, manual_override, reactivated_at,
                    created_at, last_updated
             FROM patterns ORDER BY key",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| Ok(row_to_pattern(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut patterns = Vec::new();
    for row in rows {
        patterns.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(patterns)
}

/// Delete the pattern row for `key`. Returns whether a row existed.
pub fn delete_pattern(conn: &Connection, key: &str) -> GlintResult<bool> {
    let rows = conn
        .execute("DELETE FROM patterns WHERE key = ?1", params![key])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows > 0)
}

/// Swap the entire pattern set in one transaction.
pub fn replace_patterns(conn: &Connection, patterns: &[Pattern]) -> GlintResult<()> {
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = (|| {
        conn.execute("DELETE FROM patterns", [])
            .map_err(|e| to_storage_err(e.to_string()))?;
        for pattern in patterns {
            upsert_pattern(conn, pattern)?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => conn
            .execute_batch("COMMIT")
            .map_err(|e| to_storage_err(e.to_string())),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

/// Parse a row from the patterns table.
fn row_to_pattern(row: &rusqlite::Row<'_>) -> GlintResult<Pattern> {
    let reactivated_str: Option<String> = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let created_str: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let updated_str: String = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(Pattern {
        key: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        gl_code: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        average_amount: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        occurrence_count: row
            .get::<_, i64>(3)
            .map_err(|e| to_storage_err(e.to_string()))? as u64,
        confirm_count: row
            .get::<_, i64>(4)
            .map_err(|e| to_storage_err(e.to_string()))? as u64,
        reject_count: row
            .get::<_, i64>(5)
            .map_err(|e| to_storage_err(e.to_string()))? as u64,
        suppressed: row
            .get::<_, i32>(6)
            .map_err(|e| to_storage_err(e.to_string()))?
            != 0,
        manual_override: row
            .get::<_, i32>(7)
            .map_err(|e| to_storage_err(e.to_string()))?
            != 0,
        reactivated_at: reactivated_str.as_deref().map(parse_dt).transpose()?,
        created_at: parse_dt(&created_str)?,
        last_updated: parse_dt(&updated_str)?,
    })
}

/// Parse an RFC 3339 timestamp column.
pub(crate) fn parse_dt(s: &str) -> GlintResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}
