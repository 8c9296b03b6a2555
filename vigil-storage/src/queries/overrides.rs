//! Queries for the overrides table.

use std::collections::HashSet;

use rusqlite::{params, Connection};
use vigil_core::errors::StorageError;
use vigil_core::model::OverrideRecord;

use super::sqlite_err;

pub fn insert_override(conn: &Connection, o: &OverrideRecord) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO overrides (transcript_id, finding_id, overridden_by, reason, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            o.transcript_id,
            o.finding_id,
            o.overridden_by,
            o.reason,
            o.created_at,
            o.expires_at,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

pub fn overrides_for_transcript(
    conn: &Connection,
    transcript_id: &str,
) -> Result<Vec<OverrideRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, transcript_id, finding_id, overridden_by, reason, created_at, expires_at
             FROM overrides WHERE transcript_id = ?1 ORDER BY id",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![transcript_id], |row| {
            Ok(OverrideRecord {
                id: Some(row.get(0)?),
                transcript_id: row.get(1)?,
                finding_id: row.get(2)?,
                overridden_by: row.get(3)?,
                reason: row.get(4)?,
                created_at: row.get(5)?,
                expires_at: row.get(6)?,
            })
        })
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;
    Ok(rows)
}

/// Transcript ids with an active transcript-level override at `now`.
pub fn overridden_transcript_ids(
    conn: &Connection,
    now: u64,
) -> Result<HashSet<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT DISTINCT transcript_id FROM overrides
             WHERE finding_id IS NULL AND (expires_at IS NULL OR expires_at > ?1)",
        )
        .map_err(sqlite_err)?;
    let ids = stmt
        .query_map(params![now], |row| row.get::<_, String>(0))
        .map_err(sqlite_err)?
        .collect::<Result<HashSet<_>, _>>()
        .map_err(sqlite_err)?;
    Ok(ids)
}
