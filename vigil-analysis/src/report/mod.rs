//! Presentation-layer views over stored audits.
//!
//! The core's outputs stay unsuppressed ground truth; overrides are
//! applied here, at report time, and evidence is never deleted.

use vigil_core::config::ScoringConfig;
use vigil_core::errors::StorageError;
use vigil_storage::queries::FindingRow;
use vigil_storage::AuditStore;

/// Transcript ids worth a reviewer's attention: the latest run carries
/// a critical finding or a score at or above the display threshold,
/// excluding transcripts with an active transcript-level override.
pub fn actionable_transcripts(
    store: &AuditStore,
    config: &ScoringConfig,
    now: u64,
) -> Result<Vec<String>, StorageError> {
    let overridden = store.overridden_transcript_ids(now)?;
    let mut actionable = Vec::new();
    for id in store.list_transcript_ids()? {
        if overridden.contains(&id) {
            continue;
        }
        let Some(run_row) = store.latest_run(&id)? else {
            continue;
        };
        if run_row.run.has_critical || run_row.run.score >= config.score_threshold {
            actionable.push(id);
        }
    }
    Ok(actionable)
}

/// Findings from the latest run with active overrides applied: an
/// active transcript-level override hides everything; finding-level
/// overrides hide their single finding.
pub fn effective_findings(
    store: &AuditStore,
    transcript_id: &str,
    now: u64,
) -> Result<Vec<FindingRow>, StorageError> {
    if store.is_transcript_overridden(transcript_id, now)? {
        return Ok(Vec::new());
    }
    let overrides = store.overrides_for_transcript(transcript_id)?;
    let rows = store.latest_findings(transcript_id)?;
    Ok(rows
        .into_iter()
        .filter(|row| {
            !overrides
                .iter()
                .any(|o| o.finding_id == Some(row.id) && o.is_active(now))
        })
        .collect())
}
