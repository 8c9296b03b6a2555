//! Queries for DPA events and reduced metrics.

use std::collections::BTreeMap;

use rusqlite::{params, Connection, OptionalExtension};
use vigil_core::errors::StorageError;
use vigil_core::model::{DpaEvent, DpaMetrics};

use super::sqlite_err;

/// Replace all events for a transcript with the given batch.
pub fn replace_events(
    conn: &Connection,
    transcript_id: &str,
    events: &[DpaEvent],
) -> Result<(), StorageError> {
    conn.execute(
        "DELETE FROM dpa_events WHERE transcript_id = ?1",
        params![transcript_id],
    )
    .map_err(sqlite_err)?;
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO dpa_events (transcript_id, timestamp_sec, screen_id) VALUES (?1, ?2, ?3)",
        )
        .map_err(sqlite_err)?;
    for e in events {
        stmt.execute(params![transcript_id, e.timestamp_sec, e.screen_id])
            .map_err(sqlite_err)?;
    }
    Ok(())
}

pub fn events_for_transcript(
    conn: &Connection,
    transcript_id: &str,
) -> Result<Vec<DpaEvent>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT timestamp_sec, screen_id FROM dpa_events
             WHERE transcript_id = ?1 ORDER BY timestamp_sec",
        )
        .map_err(sqlite_err)?;
    let events = stmt
        .query_map(params![transcript_id], |row| {
            Ok(DpaEvent {
                transcript_id: transcript_id.to_string(),
                timestamp_sec: row.get(0)?,
                screen_id: row.get(1)?,
            })
        })
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;
    Ok(events)
}

pub fn upsert_metrics(conn: &Connection, m: &DpaMetrics) -> Result<(), StorageError> {
    let dwell = serde_json::to_string(&m.dwell_by_screen).map_err(|e| {
        StorageError::Serialization {
            what: "dwell_by_screen".to_string(),
            message: e.to_string(),
        }
    })?;
    conn.execute(
        "INSERT OR REPLACE INTO dpa_metrics
             (transcript_id, call_duration_sec, idle_sec, idle_ratio, max_dwell_sec, dwell_by_screen)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            m.transcript_id,
            m.call_duration_sec,
            m.idle_sec,
            m.idle_ratio,
            m.max_dwell_sec,
            dwell,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn metrics_for_transcript(
    conn: &Connection,
    transcript_id: &str,
) -> Result<Option<DpaMetrics>, StorageError> {
    let row = conn
        .query_row(
            "SELECT call_duration_sec, idle_sec, idle_ratio, max_dwell_sec, dwell_by_screen
             FROM dpa_metrics WHERE transcript_id = ?1",
            params![transcript_id],
            |row| {
                Ok((
                    row.get::<_, f64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()
        .map_err(sqlite_err)?;

    let Some((call_duration_sec, idle_sec, idle_ratio, max_dwell_sec, dwell)) = row else {
        return Ok(None);
    };
    let dwell_by_screen: BTreeMap<String, f64> =
        serde_json::from_str(&dwell).map_err(|e| StorageError::Serialization {
            what: "dwell_by_screen".to_string(),
            message: e.to_string(),
        })?;

    Ok(Some(DpaMetrics {
        transcript_id: transcript_id.to_string(),
        call_duration_sec,
        idle_sec,
        idle_ratio,
        max_dwell_sec,
        dwell_by_screen,
    }))
}
