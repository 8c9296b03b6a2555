//! V001: Initial schema.
//! transcripts, audit_runs, findings, overrides, dpa_events, dpa_metrics.

pub const MIGRATION_SQL: &str = r#"
-- Transcripts: immutable once inserted; re-audits append audit_runs rows.
CREATE TABLE IF NOT EXISTS transcripts (
    id TEXT PRIMARY KEY,
    persona TEXT NOT NULL,
    language TEXT NOT NULL,
    intended_risk_level TEXT NOT NULL,
    scenario_id TEXT NOT NULL,
    expected_findings TEXT NOT NULL,
    turns TEXT NOT NULL,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_transcripts_created
    ON transcripts(created_at DESC);

-- Audit runs: append-only history; consumers read the latest per transcript.
CREATE TABLE IF NOT EXISTS audit_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    transcript_id TEXT NOT NULL,
    score REAL NOT NULL,
    severity_band TEXT NOT NULL,
    has_critical INTEGER NOT NULL DEFAULT 0,
    run_at INTEGER NOT NULL,
    outcome_summary TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_audit_runs_transcript
    ON audit_runs(transcript_id, id DESC);

-- Findings: written in the same transaction as their audit run.
CREATE TABLE IF NOT EXISTS findings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES audit_runs(id),
    transcript_id TEXT NOT NULL,
    rule_id TEXT NOT NULL,
    passed INTEGER NOT NULL,
    severity TEXT NOT NULL,
    reason TEXT NOT NULL,
    snippet TEXT,
    weight REAL NOT NULL,
    UNIQUE(run_id, rule_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_findings_run ON findings(run_id);
CREATE INDEX IF NOT EXISTS idx_findings_transcript ON findings(transcript_id);

-- Overrides: evidence is never deleted; suppression is presentation-time.
CREATE TABLE IF NOT EXISTS overrides (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    transcript_id TEXT NOT NULL,
    finding_id INTEGER REFERENCES findings(id),
    overridden_by TEXT NOT NULL,
    reason TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    expires_at INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_overrides_transcript
    ON overrides(transcript_id);

-- Raw DPA events, replaced wholesale per transcript.
CREATE TABLE IF NOT EXISTS dpa_events (
    transcript_id TEXT NOT NULL,
    timestamp_sec REAL NOT NULL,
    screen_id TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_dpa_events_transcript
    ON dpa_events(transcript_id, timestamp_sec);

-- Reduced DPA metrics, one row per transcript.
CREATE TABLE IF NOT EXISTS dpa_metrics (
    transcript_id TEXT PRIMARY KEY,
    call_duration_sec REAL NOT NULL,
    idle_sec REAL NOT NULL,
    idle_ratio REAL NOT NULL,
    max_dwell_sec REAL NOT NULL,
    dwell_by_screen TEXT NOT NULL
) STRICT;
"#;
