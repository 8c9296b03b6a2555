//! Queries for the transcripts table.

use rusqlite::{params, Connection, OptionalExtension};
use vigil_core::errors::StorageError;
use vigil_core::model::{Transcript, Turn};

use super::{parse, sqlite_err};

fn json_err(what: &str) -> impl FnOnce(serde_json::Error) -> StorageError + '_ {
    move |e| StorageError::Serialization {
        what: what.to_string(),
        message: e.to_string(),
    }
}

pub fn insert_transcript(conn: &Connection, t: &Transcript) -> Result<(), StorageError> {
    let turns = serde_json::to_string(&t.turns).map_err(json_err("turns"))?;
    let expected =
        serde_json::to_string(&t.expected_findings).map_err(json_err("expected_findings"))?;
    conn.execute(
        "INSERT INTO transcripts (id, persona, language, intended_risk_level, scenario_id, expected_findings, turns, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            t.id,
            t.persona.as_str(),
            parse::language_str(t.language),
            parse::risk_level_str(t.intended_risk_level),
            t.scenario_id,
            expected,
            turns,
            t.created_at,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn get_transcript(
    conn: &Connection,
    transcript_id: &str,
) -> Result<Option<Transcript>, StorageError> {
    let row = conn
        .query_row(
            "SELECT id, persona, language, intended_risk_level, scenario_id, expected_findings, turns, created_at
             FROM transcripts WHERE id = ?1",
            params![transcript_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, u64>(7)?,
                ))
            },
        )
        .optional()
        .map_err(sqlite_err)?;

    let Some((id, persona, language, risk, scenario_id, expected, turns, created_at)) = row
    else {
        return Ok(None);
    };

    let turns: Vec<Turn> = serde_json::from_str(&turns).map_err(json_err("turns"))?;
    let expected_findings: Vec<String> =
        serde_json::from_str(&expected).map_err(json_err("expected_findings"))?;

    Ok(Some(Transcript {
        id,
        persona: parse::persona(&persona)?,
        language: parse::language(&language)?,
        intended_risk_level: parse::risk_level(&risk)?,
        scenario_id,
        expected_findings,
        turns,
        created_at,
    }))
}

pub fn list_transcript_ids(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT id FROM transcripts ORDER BY created_at DESC, id")
        .map_err(sqlite_err)?;
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;
    Ok(ids)
}
