//! Audit pipeline: one evaluation pass per transcript.
//!
//! Runs the transcript and process evaluators (order-independent, no
//! shared mutable state), concatenates their findings, scores them, and
//! persists findings + run atomically. Batches fan out over rayon;
//! transcript id is the partition key.

use std::time::{SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use tracing::{info, warn};
use vigil_core::config::AuditConfig;
use vigil_core::errors::{CatalogError, PipelineError};
use vigil_core::model::{AuditRun, DpaMetrics, Finding, SeverityBand, Transcript};
use vigil_storage::AuditStore;

use crate::catalog::RuleCatalog;
use crate::evaluate::{ProcessEvaluator, ProcessOutcome, TranscriptEvaluator};
use crate::scoring::{display_score, score_findings};
use crate::summary::{rule_based_summary, ChatSummarizer, RuleBasedSummarizer, Summarizer};

/// A scored but not yet persisted evaluation.
#[derive(Debug)]
pub struct Evaluation {
    pub findings: Vec<Finding>,
    pub score: f64,
    pub band: SeverityBand,
    pub has_critical: bool,
    /// False when metrics were absent or structurally invalid; the
    /// score then reflects transcript findings only.
    pub metrics_available: bool,
}

/// A persisted audit pass.
#[derive(Debug)]
pub struct AuditOutcome {
    pub run_id: i64,
    pub run: AuditRun,
    pub findings: Vec<Finding>,
}

/// Composes the evaluators, scorer, summarizer, and store into one
/// audit operation.
pub struct AuditPipeline {
    transcript_eval: TranscriptEvaluator,
    process_eval: ProcessEvaluator,
    summarizer: Box<dyn Summarizer>,
}

impl AuditPipeline {
    /// Build from a catalog and configuration. The summarizer is chosen
    /// here, once: the chat client when enabled and configured, the
    /// deterministic fallback otherwise. Scoring logic never branches
    /// on which one is in play.
    pub fn new(catalog: &RuleCatalog, config: &AuditConfig) -> Result<Self, CatalogError> {
        let summarizer: Box<dyn Summarizer> = if config.summary.enabled {
            match ChatSummarizer::from_config(&config.summary) {
                Ok(client) => Box::new(client),
                Err(e) => {
                    warn!(error = %e, "summarizer disabled, using rule-based fallback");
                    Box::new(RuleBasedSummarizer)
                }
            }
        } else {
            Box::new(RuleBasedSummarizer)
        };
        Self::with_summarizer(catalog, config, summarizer)
    }

    /// Build with an explicit summarizer implementation.
    pub fn with_summarizer(
        catalog: &RuleCatalog,
        config: &AuditConfig,
        summarizer: Box<dyn Summarizer>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            transcript_eval: TranscriptEvaluator::new(catalog, &config.evaluator)?,
            process_eval: ProcessEvaluator::new(catalog),
            summarizer,
        })
    }

    /// Evaluate without persisting. Deterministic: unchanged inputs and
    /// catalog produce byte-identical findings.
    pub fn evaluate(&self, transcript: &Transcript, metrics: Option<&DpaMetrics>) -> Evaluation {
        let mut findings = self.transcript_eval.evaluate(transcript);

        let metrics_available =
            match self.process_eval.evaluate(&transcript.id, metrics) {
                ProcessOutcome::Evaluated(process_findings) => {
                    findings.extend(process_findings);
                    true
                }
                ProcessOutcome::Unavailable { reason } => {
                    warn!(
                        transcript_id = %transcript.id,
                        %reason,
                        "process metrics unavailable, scoring transcript findings only"
                    );
                    false
                }
            };

        let outcome = score_findings(&findings);
        Evaluation {
            findings,
            score: outcome.score,
            band: outcome.band,
            has_critical: outcome.has_critical,
            metrics_available,
        }
    }

    /// Audit one transcript: evaluate, summarize, persist atomically.
    pub fn audit(
        &self,
        store: &AuditStore,
        transcript: &Transcript,
        metrics: Option<&DpaMetrics>,
    ) -> Result<AuditOutcome, PipelineError> {
        let evaluation = self.evaluate(transcript, metrics);

        // Summarizer failures are recovered here; the audit outcome is
        // already fixed and a run always carries a non-empty reason.
        let summary = self
            .summarizer
            .summarize(transcript, &evaluation.findings, evaluation.band)
            .unwrap_or_else(|e| {
                warn!(
                    summarizer = self.summarizer.name(),
                    error = %e,
                    "summarizer failed, substituting rule-based reasons"
                );
                rule_based_summary(&evaluation.findings, evaluation.band)
            });

        let run = AuditRun {
            transcript_id: transcript.id.clone(),
            score: display_score(evaluation.score),
            severity_band: evaluation.band,
            has_critical: evaluation.has_critical,
            run_at: now_epoch(),
            outcome_summary: Some(summary),
        };
        let run_id = store.persist_audit(&evaluation.findings, &run)?;
        info!(
            transcript_id = %transcript.id,
            run_id,
            score = run.score,
            band = run.severity_band.as_str(),
            "audit complete"
        );

        Ok(AuditOutcome {
            run_id,
            run,
            findings: evaluation.findings,
        })
    }

    /// Audit a batch in parallel. Evaluation is stateless per
    /// transcript; the store is the only shared resource.
    pub fn audit_all(
        &self,
        store: &AuditStore,
        batch: &[(Transcript, Option<DpaMetrics>)],
    ) -> Vec<Result<AuditOutcome, PipelineError>> {
        batch
            .par_iter()
            .map(|(transcript, metrics)| self.audit(store, transcript, metrics.as_ref()))
            .collect()
    }

    /// Fill missing outcome summaries on the latest runs of stored
    /// transcripts. Returns how many were updated.
    pub fn backfill_summaries(&self, store: &AuditStore) -> Result<usize, PipelineError> {
        let mut updated = 0;
        for id in store.list_transcript_ids()? {
            let Some(run_row) = store.latest_run(&id)? else {
                continue;
            };
            if run_row.run.outcome_summary.is_some() {
                continue;
            }
            let Some(transcript) = store.get_transcript(&id)? else {
                continue;
            };
            let findings: Vec<Finding> = store
                .findings_for_run(run_row.id)?
                .into_iter()
                .map(|row| row.finding)
                .collect();
            let summary = self
                .summarizer
                .summarize(&transcript, &findings, run_row.run.severity_band)
                .unwrap_or_else(|_| {
                    rule_based_summary(&findings, run_row.run.severity_band)
                });
            if store.update_latest_summary(&id, &summary)? {
                updated += 1;
            }
        }
        Ok(updated)
    }
}

fn now_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
