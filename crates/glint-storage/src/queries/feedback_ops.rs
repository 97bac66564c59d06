//! Append and load for the immutable feedback log.

use rusqlite::{params, Connection};
use uuid::Uuid;

use glint_core::errors::GlintResult;
use glint_core::models::{FeedbackEvent, FeedbackKind};

use super::pattern_ops::parse_dt;
use crate::to_storage_err;

/// Append one feedback event. Events are never updated or deleted.
pub fn append_feedback(conn: &Connection, event: &FeedbackEvent) -> GlintResult<()> {
    conn.execute(
        "INSERT INTO feedback_events (
            id, key, predicted_gl_code, actual_gl_code, kind, recorded_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event.id.to_string(),
            event.key,
            event.predicted_gl_code,
            event.actual_gl_code,
            event.kind.as_str(),
            event.recorded_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Load the full feedback log, oldest first.
pub fn load_feedback(conn: &Connection) -> GlintResult<Vec<FeedbackEvent>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, key, predicted_gl_code, actual_gl_code, kind, recorded_at
             FROM feedback_events ORDER BY recorded_at",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| Ok(row_to_event(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut events = Vec::new();
    for row in rows {
        events.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(events)
}

fn row_to_event(row: &rusqlite::Row<'_>) -> GlintResult<FeedbackEvent> {
    let id_str: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let kind_str: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let recorded_str: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(FeedbackEvent {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| to_storage_err(format!("parse feedback id '{id_str}': {e}")))?,
        key: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        predicted_gl_code: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        actual_gl_code: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        kind: FeedbackKind::parse(&kind_str)
            .ok_or_else(|| to_storage_err(format!("unknown feedback kind '{kind_str}'")))?,
        recorded_at: parse_dt(&recorded_str)?,
    })
}
