//! AuditStore — the typed facade the pipeline and report layer use.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;
use vigil_core::errors::StorageError;
use vigil_core::model::{AuditRun, DpaEvent, DpaMetrics, Finding, OverrideRecord, Transcript};

use crate::connection::DatabaseManager;
use crate::queries::{self, AuditRunRow, FindingRow};

/// Keyed record store over SQLite. Safe to share across audit threads:
/// writes are serialized, reads are pooled.
pub struct AuditStore {
    db: DatabaseManager,
}

impl AuditStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    pub fn manager(&self) -> &DatabaseManager {
        &self.db
    }

    // ─── Transcripts ─────────────────────────────────────────────────

    pub fn insert_transcript(&self, t: &Transcript) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::transcripts::insert_transcript(conn, t))
    }

    pub fn get_transcript(&self, id: &str) -> Result<Option<Transcript>, StorageError> {
        self.db
            .with_reader(|conn| queries::transcripts::get_transcript(conn, id))
    }

    pub fn list_transcript_ids(&self) -> Result<Vec<String>, StorageError> {
        self.db
            .with_reader(queries::transcripts::list_transcript_ids)
    }

    // ─── Findings + audit runs ───────────────────────────────────────

    /// Persist one audit pass atomically: the run row and all of its
    /// findings become visible together or not at all.
    pub fn persist_audit(
        &self,
        findings: &[Finding],
        run: &AuditRun,
    ) -> Result<i64, StorageError> {
        self.db.with_writer(|conn| {
            let tx = conn.unchecked_transaction().map_err(|e| {
                StorageError::SqliteError {
                    message: e.to_string(),
                }
            })?;
            let run_id = queries::findings::insert_audit_run(&tx, run)?;
            queries::findings::insert_findings(&tx, run_id, findings)?;
            tx.commit().map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })?;
            debug!(
                transcript_id = %run.transcript_id,
                run_id,
                findings = findings.len(),
                "persisted audit run"
            );
            Ok(run_id)
        })
    }

    pub fn latest_run(&self, transcript_id: &str) -> Result<Option<AuditRunRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::findings::latest_run(conn, transcript_id))
    }

    pub fn runs_for_transcript(
        &self,
        transcript_id: &str,
    ) -> Result<Vec<AuditRunRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::findings::runs_for_transcript(conn, transcript_id))
    }

    pub fn findings_for_run(&self, run_id: i64) -> Result<Vec<FindingRow>, StorageError> {
        self.db
            .with_reader(|conn| queries::findings::findings_for_run(conn, run_id))
    }

    /// Findings belonging to the latest audit run, if any.
    pub fn latest_findings(&self, transcript_id: &str) -> Result<Vec<FindingRow>, StorageError> {
        match self.latest_run(transcript_id)? {
            Some(row) => self.findings_for_run(row.id),
            None => Ok(Vec::new()),
        }
    }

    pub fn update_latest_summary(
        &self,
        transcript_id: &str,
        summary: &str,
    ) -> Result<bool, StorageError> {
        self.db.with_writer(|conn| {
            queries::findings::update_latest_summary(conn, transcript_id, summary)
        })
    }

    // ─── Overrides ───────────────────────────────────────────────────

    pub fn add_override(&self, o: &OverrideRecord) -> Result<i64, StorageError> {
        self.db
            .with_writer(|conn| queries::overrides::insert_override(conn, o))
    }

    pub fn overrides_for_transcript(
        &self,
        transcript_id: &str,
    ) -> Result<Vec<OverrideRecord>, StorageError> {
        self.db
            .with_reader(|conn| queries::overrides::overrides_for_transcript(conn, transcript_id))
    }

    /// True if the transcript has an active transcript-level override.
    pub fn is_transcript_overridden(
        &self,
        transcript_id: &str,
        now: u64,
    ) -> Result<bool, StorageError> {
        let overrides = self.overrides_for_transcript(transcript_id)?;
        Ok(overrides
            .iter()
            .any(|o| o.is_transcript_level() && o.is_active(now)))
    }

    pub fn overridden_transcript_ids(&self, now: u64) -> Result<HashSet<String>, StorageError> {
        self.db
            .with_reader(|conn| queries::overrides::overridden_transcript_ids(conn, now))
    }

    // ─── DPA ─────────────────────────────────────────────────────────

    pub fn replace_dpa_events(
        &self,
        transcript_id: &str,
        events: &[DpaEvent],
    ) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::dpa::replace_events(conn, transcript_id, events))
    }

    pub fn dpa_events(&self, transcript_id: &str) -> Result<Vec<DpaEvent>, StorageError> {
        self.db
            .with_reader(|conn| queries::dpa::events_for_transcript(conn, transcript_id))
    }

    pub fn upsert_dpa_metrics(&self, m: &DpaMetrics) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::dpa::upsert_metrics(conn, m))
    }

    pub fn dpa_metrics(&self, transcript_id: &str) -> Result<Option<DpaMetrics>, StorageError> {
        self.db
            .with_reader(|conn| queries::dpa::metrics_for_transcript(conn, transcript_id))
    }
}
