//! Queries for findings and audit_runs. The two are written together in
//! one transaction by `AuditStore::persist_audit`.

use rusqlite::{params, Connection, OptionalExtension};
use vigil_core::errors::StorageError;
use vigil_core::model::{AuditRun, Finding};

use super::{parse, sqlite_err};

/// A persisted finding with its row id (referenced by overrides).
#[derive(Debug, Clone)]
pub struct FindingRow {
    pub id: i64,
    pub run_id: i64,
    pub finding: Finding,
}

/// A persisted audit run with its row id.
#[derive(Debug, Clone)]
pub struct AuditRunRow {
    pub id: i64,
    pub run: AuditRun,
}

pub fn insert_audit_run(conn: &Connection, run: &AuditRun) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO audit_runs (transcript_id, score, severity_band, has_critical, run_at, outcome_summary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            run.transcript_id,
            run.score,
            run.severity_band.as_str(),
            run.has_critical as i64,
            run.run_at,
            run.outcome_summary,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_findings(
    conn: &Connection,
    run_id: i64,
    findings: &[Finding],
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO findings (run_id, transcript_id, rule_id, passed, severity, reason, snippet, weight)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(sqlite_err)?;
    for f in findings {
        stmt.execute(params![
            run_id,
            f.transcript_id,
            f.rule_id,
            f.passed as i64,
            f.severity.as_str(),
            f.reason,
            f.snippet,
            f.weight,
        ])
        .map_err(sqlite_err)?;
    }
    Ok(())
}

pub fn latest_run(
    conn: &Connection,
    transcript_id: &str,
) -> Result<Option<AuditRunRow>, StorageError> {
    let row = conn
        .query_row(
            "SELECT id, transcript_id, score, severity_band, has_critical, run_at, outcome_summary
             FROM audit_runs WHERE transcript_id = ?1 ORDER BY id DESC LIMIT 1",
            params![transcript_id],
            map_run_row,
        )
        .optional()
        .map_err(sqlite_err)?;
    row.map(finish_run_row).transpose()
}

pub fn runs_for_transcript(
    conn: &Connection,
    transcript_id: &str,
) -> Result<Vec<AuditRunRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, transcript_id, score, severity_band, has_critical, run_at, outcome_summary
             FROM audit_runs WHERE transcript_id = ?1 ORDER BY id",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![transcript_id], map_run_row)
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;
    rows.into_iter().map(finish_run_row).collect()
}

pub fn findings_for_run(conn: &Connection, run_id: i64) -> Result<Vec<FindingRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, run_id, transcript_id, rule_id, passed, severity, reason, snippet, weight
             FROM findings WHERE run_id = ?1 ORDER BY id",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![run_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, f64>(8)?,
            ))
        })
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;

    rows.into_iter()
        .map(
            |(id, run_id, transcript_id, rule_id, passed, severity, reason, snippet, weight)| {
                Ok(FindingRow {
                    id,
                    run_id,
                    finding: Finding {
                        transcript_id,
                        rule_id,
                        passed: passed != 0,
                        severity: parse::severity(&severity)?,
                        reason,
                        snippet,
                        weight,
                    },
                })
            },
        )
        .collect()
}

/// Set the outcome summary on the latest run for a transcript.
pub fn update_latest_summary(
    conn: &Connection,
    transcript_id: &str,
    summary: &str,
) -> Result<bool, StorageError> {
    let changed = conn
        .execute(
            "UPDATE audit_runs SET outcome_summary = ?1 WHERE id = (
                 SELECT id FROM audit_runs WHERE transcript_id = ?2 ORDER BY id DESC LIMIT 1
             )",
            params![summary, transcript_id],
        )
        .map_err(sqlite_err)?;
    Ok(changed > 0)
}

type RawRun = (i64, String, f64, String, i64, u64, Option<String>);

fn map_run_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRun> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn finish_run_row(raw: RawRun) -> Result<AuditRunRow, StorageError> {
    let (id, transcript_id, score, band, has_critical, run_at, outcome_summary) = raw;
    Ok(AuditRunRow {
        id,
        run: AuditRun {
            transcript_id,
            score,
            severity_band: parse::band(&band)?,
            has_critical: has_critical != 0,
            run_at,
            outcome_summary,
        },
    })
}
