//! Embedding records, one per key, vectors stored as little-endian
//! f32 blobs.

use rusqlite::{params, Connection};
use uuid::Uuid;

use glint_core::errors::GlintResult;
use glint_core::models::EmbeddingRecord;

use super::pattern_ops::parse_dt;
use crate::to_storage_err;

/// Insert or overwrite the record for its key.
pub fn save_embedding(conn: &Connection, record: &EmbeddingRecord) -> GlintResult<()> {
    conn.execute(
        "INSERT INTO embeddings (id, key, gl_code, vector, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(key) DO UPDATE SET
            id = excluded.id,
            gl_code = excluded.gl_code,
            vector = excluded.vector,
            created_at = excluded.created_at",
        params![
            record.id.to_string(),
            record.key,
            record.gl_code,
            f32_vec_to_bytes(&record.vector),
            record.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Load every embedding record.
pub fn load_embeddings(conn: &Connection) -> GlintResult<Vec<EmbeddingRecord>> {
    let mut stmt = conn
        .prepare("SELECT id, key, gl_code, vector, created_at FROM embeddings ORDER BY key")
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| Ok(row_to_record(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(records)
}

/// Swap the entire embedding set in one transaction.
pub fn replace_embeddings(conn: &Connection, records: &[EmbeddingRecord]) -> GlintResult<()> {
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = (|| {
        conn.execute("DELETE FROM embeddings", [])
            .map_err(|e| to_storage_err(e.to_string()))?;
        for record in records {
            save_embedding(conn, record)?;
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

fn row_to_record(row: &rusqlite::Row<'_>) -> GlintResult<EmbeddingRecord> {
    let id_str: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let blob: Vec<u8> = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let created_str: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(EmbeddingRecord {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| to_storage_err(format!("parse embedding id '{id_str}': {e}")))?,
        key: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        gl_code: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        vector: bytes_to_f32_vec(&blob),
        created_at: parse_dt(&created_str)?,
    })
}

fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
