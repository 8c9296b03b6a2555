//! End-to-end pipeline: synthetic scenarios through evaluation, scoring,
//! atomic persistence, overrides, and summary fallback.

use std::collections::{BTreeMap, HashSet};
use std::sync::Once;

use vigil_analysis::catalog::RuleCatalog;
use vigil_analysis::pipeline::AuditPipeline;
use vigil_analysis::report::{actionable_transcripts, effective_findings};
use vigil_analysis::summary::Summarizer;
use vigil_analysis::synthetic::{builtin_scenarios, generate_transcript};
use vigil_analysis::{dpa, synthetic};
use vigil_core::config::AuditConfig;
use vigil_core::errors::SummaryError;
use vigil_core::model::{
    AuditRun, DpaMetrics, Finding, Language, OverrideRecord, RiskLevel, SeverityBand, Transcript,
};
use vigil_storage::AuditStore;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

fn pipeline(config: &AuditConfig) -> AuditPipeline {
    let catalog = RuleCatalog::builtin(config).unwrap();
    AuditPipeline::new(&catalog, config).unwrap()
}

fn normal_metrics(transcript: &Transcript, config: &AuditConfig) -> DpaMetrics {
    let (_, metrics) = dpa::synthesize_metrics(
        transcript,
        dpa::DpaBias::Normal,
        config.process.gap_threshold_sec,
    );
    metrics
}

#[test]
fn every_scenario_triggers_its_expected_findings() {
    init_tracing();
    let config = AuditConfig::default();
    let pipeline = pipeline(&config);

    for transcript in synthetic::generate_all(1_700_000_000) {
        let metrics = normal_metrics(&transcript, &config);
        let evaluation = pipeline.evaluate(&transcript, Some(&metrics));
        let failed: HashSet<&str> = evaluation
            .findings
            .iter()
            .filter(|f| !f.passed)
            .map(|f| f.rule_id.as_str())
            .collect();

        for expected in &transcript.expected_findings {
            assert!(
                failed.contains(expected.as_str()),
                "{}: expected finding {expected} missing; failed = {failed:?}",
                transcript.id
            );
        }
        if transcript.intended_risk_level == RiskLevel::Good {
            assert!(
                failed.is_empty(),
                "{}: clean scenario failed {failed:?}",
                transcript.id
            );
            assert_eq!(evaluation.score, 0.0);
            assert_eq!(evaluation.band, SeverityBand::Good);
        }
        if transcript.intended_risk_level == RiskLevel::Critical {
            assert!(evaluation.has_critical, "{}", transcript.id);
            assert_eq!(evaluation.band, SeverityBand::Critical);
        }
    }
}

#[test]
fn audit_persists_run_and_findings_together() {
    init_tracing();
    let config = AuditConfig::default();
    let pipeline = pipeline(&config);
    let store = AuditStore::open_in_memory().unwrap();

    let scenario = builtin_scenarios()
        .iter()
        .find(|s| s.id == "collections_no_recap")
        .unwrap();
    let transcript = generate_transcript(scenario, Language::En, 0, 1_700_000_000);
    store.insert_transcript(&transcript).unwrap();
    let metrics = normal_metrics(&transcript, &config);

    let outcome = pipeline.audit(&store, &transcript, Some(&metrics)).unwrap();
    assert!(outcome.run.score > 0.0);
    assert!(outcome
        .run
        .outcome_summary
        .as_deref()
        .is_some_and(|s| !s.is_empty()));

    let stored = store.latest_run(&transcript.id).unwrap().unwrap();
    assert_eq!(stored.id, outcome.run_id);
    assert_eq!(stored.run.score, outcome.run.score);
    let rows = store.findings_for_run(outcome.run_id).unwrap();
    assert_eq!(rows.len(), outcome.findings.len());
}

#[test]
fn re_running_produces_byte_identical_findings() {
    init_tracing();
    let config = AuditConfig::default();
    let pipeline = pipeline(&config);
    let store = AuditStore::open_in_memory().unwrap();

    let scenario = builtin_scenarios()
        .iter()
        .find(|s| s.id == "ram_policy_bypass")
        .unwrap();
    let transcript = generate_transcript(scenario, Language::Es, 0, 1_700_000_000);
    store.insert_transcript(&transcript).unwrap();
    let metrics = normal_metrics(&transcript, &config);

    let first = pipeline.audit(&store, &transcript, Some(&metrics)).unwrap();
    let second = pipeline.audit(&store, &transcript, Some(&metrics)).unwrap();

    // Only run ids and timestamps may differ; the findings are
    // byte-identical.
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(
        serde_json::to_string(&first.findings).unwrap(),
        serde_json::to_string(&second.findings).unwrap()
    );
    assert_eq!(first.run.score, second.run.score);
    assert_eq!(first.run.severity_band, second.run.severity_band);
    assert_eq!(store.runs_for_transcript(&transcript.id).unwrap().len(), 2);
}

#[test]
fn invalid_metrics_score_transcript_findings_only() {
    init_tracing();
    let config = AuditConfig::default();
    let pipeline = pipeline(&config);

    let scenario = builtin_scenarios()
        .iter()
        .find(|s| s.id == "collections_no_recap")
        .unwrap();
    let transcript = generate_transcript(scenario, Language::En, 0, 1_700_000_000);

    let invalid = DpaMetrics {
        transcript_id: transcript.id.clone(),
        call_duration_sec: 240.0,
        idle_sec: 336.0,
        idle_ratio: 1.4,
        max_dwell_sec: 0.0,
        dwell_by_screen: BTreeMap::new(),
    };
    let with_invalid = pipeline.evaluate(&transcript, Some(&invalid));
    assert!(!with_invalid.metrics_available);
    assert!(with_invalid
        .findings
        .iter()
        .all(|f| f.rule_id != "high_idle_ratio" && f.rule_id != "high_dwell"));

    // Identical to evaluating with no metrics at all.
    let without = pipeline.evaluate(&transcript, None);
    assert_eq!(
        serde_json::to_string(&with_invalid.findings).unwrap(),
        serde_json::to_string(&without.findings).unwrap()
    );
    assert_eq!(with_invalid.score, without.score);
}

#[test]
fn override_leaves_stored_run_untouched() {
    init_tracing();
    let config = AuditConfig::default();
    let pipeline = pipeline(&config);
    let store = AuditStore::open_in_memory().unwrap();
    let now = 1_700_000_000;

    let scenario = builtin_scenarios()
        .iter()
        .find(|s| s.id == "collections_no_recap")
        .unwrap();
    let transcript = generate_transcript(scenario, Language::En, 0, now);
    store.insert_transcript(&transcript).unwrap();
    let outcome = pipeline.audit(&store, &transcript, None).unwrap();

    let failed_row = store
        .findings_for_run(outcome.run_id)
        .unwrap()
        .into_iter()
        .find(|r| !r.finding.passed)
        .unwrap();

    store
        .add_override(&OverrideRecord {
            id: None,
            transcript_id: transcript.id.clone(),
            finding_id: Some(failed_row.id),
            overridden_by: "qa-reviewer".to_string(),
            reason: "agent recapped verbally off-channel".to_string(),
            created_at: now,
            expires_at: None,
        })
        .unwrap();

    // The stored run is the unsuppressed ground truth.
    let stored = store.latest_run(&transcript.id).unwrap().unwrap();
    assert_eq!(stored.run.score, outcome.run.score);
    assert_eq!(stored.run.severity_band, outcome.run.severity_band);

    // Only the presentation-layer view hides the overridden finding.
    let effective = effective_findings(&store, &transcript.id, now).unwrap();
    assert!(effective.iter().all(|r| r.id != failed_row.id));
    assert_eq!(
        effective.len(),
        store.findings_for_run(outcome.run_id).unwrap().len() - 1
    );
}

#[test]
fn actionable_filter_applies_threshold_critical_and_overrides() {
    init_tracing();
    let config = AuditConfig::default();
    let pipeline = pipeline(&config);
    let store = AuditStore::open_in_memory().unwrap();
    let now = 1_700_000_000;

    let scenarios = builtin_scenarios();
    let clean = generate_transcript(
        scenarios.iter().find(|s| s.id == "collections_clean_call").unwrap(),
        Language::En,
        0,
        now,
    );
    let critical = generate_transcript(
        scenarios.iter().find(|s| s.id == "ram_policy_bypass").unwrap(),
        Language::En,
        0,
        now,
    );
    let overridden = generate_transcript(
        scenarios.iter().find(|s| s.id == "collections_third_party_disclosure").unwrap(),
        Language::En,
        0,
        now,
    );

    for t in [&clean, &critical, &overridden] {
        store.insert_transcript(t).unwrap();
        let metrics = normal_metrics(t, &config);
        pipeline.audit(&store, t, Some(&metrics)).unwrap();
    }
    store
        .add_override(&OverrideRecord {
            id: None,
            transcript_id: overridden.id.clone(),
            finding_id: None,
            overridden_by: "compliance-lead".to_string(),
            reason: "handled in coaching session".to_string(),
            created_at: now,
            expires_at: None,
        })
        .unwrap();

    let actionable = actionable_transcripts(&store, &config.scoring, now).unwrap();
    assert!(actionable.contains(&critical.id));
    assert!(!actionable.contains(&clean.id));
    assert!(!actionable.contains(&overridden.id));
}

struct FailingSummarizer;

impl Summarizer for FailingSummarizer {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn summarize(
        &self,
        _transcript: &Transcript,
        _findings: &[Finding],
        _band: SeverityBand,
    ) -> Result<String, SummaryError> {
        Err(SummaryError::RequestFailed {
            reason: "quota exhausted".to_string(),
        })
    }
}

#[test]
fn summarizer_failure_substitutes_deterministic_reasons() {
    init_tracing();
    let config = AuditConfig::default();
    let catalog = RuleCatalog::builtin(&config).unwrap();
    let pipeline =
        AuditPipeline::with_summarizer(&catalog, &config, Box::new(FailingSummarizer)).unwrap();
    let store = AuditStore::open_in_memory().unwrap();

    let scenario = builtin_scenarios()
        .iter()
        .find(|s| s.id == "collections_aggressive_opening")
        .unwrap();
    let transcript = generate_transcript(scenario, Language::En, 0, 1_700_000_000);
    store.insert_transcript(&transcript).unwrap();

    // The failure never propagates and never changes the outcome; the
    // run carries the rule-based reason list instead.
    let outcome = pipeline.audit(&store, &transcript, None).unwrap();
    let summary = outcome.run.outcome_summary.unwrap();
    assert!(summary.starts_with("High:") || summary.starts_with("Critical:"));
    assert!(summary.contains("no required phrase"));
}

#[test]
fn backfill_fills_only_missing_summaries() {
    init_tracing();
    let config = AuditConfig::default();
    let pipeline = pipeline(&config);
    let store = AuditStore::open_in_memory().unwrap();
    let now = 1_700_000_000;

    let scenario = builtin_scenarios()
        .iter()
        .find(|s| s.id == "ram_no_recap")
        .unwrap();
    let transcript = generate_transcript(scenario, Language::En, 0, now);
    store.insert_transcript(&transcript).unwrap();

    // Persist a run without a summary, as an older ingest might have.
    let evaluation = pipeline.evaluate(&transcript, None);
    let run = AuditRun {
        transcript_id: transcript.id.clone(),
        score: evaluation.score,
        severity_band: evaluation.band,
        has_critical: evaluation.has_critical,
        run_at: now,
        outcome_summary: None,
    };
    store.persist_audit(&evaluation.findings, &run).unwrap();

    assert_eq!(pipeline.backfill_summaries(&store).unwrap(), 1);
    let stored = store.latest_run(&transcript.id).unwrap().unwrap();
    assert!(stored.run.outcome_summary.is_some_and(|s| !s.is_empty()));

    // Second pass has nothing left to do.
    assert_eq!(pipeline.backfill_summaries(&store).unwrap(), 0);
}

#[test]
fn batch_audit_runs_in_parallel_without_interference() {
    init_tracing();
    let config = AuditConfig::default();
    let pipeline = pipeline(&config);
    let store = AuditStore::open_in_memory().unwrap();

    let batch: Vec<_> = synthetic::generate_all(1_700_000_000)
        .into_iter()
        .map(|t| {
            store.insert_transcript(&t).unwrap();
            let metrics = normal_metrics(&t, &config);
            (t, Some(metrics))
        })
        .collect();

    let results = pipeline.audit_all(&store, &batch);
    assert_eq!(results.len(), batch.len());
    for result in &results {
        assert!(result.is_ok());
    }
    for (transcript, _) in &batch {
        assert!(store.latest_run(&transcript.id).unwrap().is_some());
    }
}
