//! Durable tier usage records.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use glint_core::errors::GlintResult;
use glint_core::models::{TierKind, TierUsageRecord};

use super::pattern_ops::parse_dt;
use crate::to_storage_err;

/// Append one usage record.
pub fn append_usage(conn: &Connection, record: &TierUsageRecord) -> GlintResult<()> {
    conn.execute(
        "INSERT INTO usage_records (tier, recorded_at, latency_ms, cost_units, success)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.tier.as_str(),
            record.recorded_at.to_rfc3339(),
            record.latency_ms,
            record.cost_units,
            record.success as i32,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Load records at or after `cutoff`, oldest first.
pub fn usage_since(conn: &Connection, cutoff: DateTime<Utc>) -> GlintResult<Vec<TierUsageRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT tier, recorded_at, latency_ms, cost_units, success
             FROM usage_records WHERE recorded_at >= ?1 ORDER BY recorded_at",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![cutoff.to_rfc3339()], |row| Ok(row_to_record(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(records)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> GlintResult<TierUsageRecord> {
    let tier_str: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let recorded_str: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(TierUsageRecord {
        tier: TierKind::parse(&tier_str)
            .ok_or_else(|| to_storage_err(format!("unknown tier '{tier_str}'")))?,
        recorded_at: parse_dt(&recorded_str)?,
        latency_ms: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        cost_units: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        success: row
            .get::<_, i32>(4)
            .map_err(|e| to_storage_err(e.to_string()))?
            != 0,
    })
}
