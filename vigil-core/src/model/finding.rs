use serde::{Deserialize, Serialize};

/// Rule severity. Ordered; `Critical` is maximal and carries override
/// power in banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Coarse outcome category for one audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Good,
    Moderate,
    High,
    Critical,
}

impl SeverityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// The result of evaluating one rule against one transcript (+ metrics).
///
/// `passed == true` means the rule's condition was satisfied (no
/// violation). `weight` and `severity` are copied from the rule at
/// evaluation time so the finding stays auditable even if the catalog
/// later changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub transcript_id: String,
    pub rule_id: String,
    pub passed: bool,
    pub severity: Severity,
    /// Names which sub-condition failed; passed findings carry a
    /// symmetric reason for auditability.
    pub reason: String,
    /// Quoted evidence (the matched turn text), truncated to a bounded
    /// length.
    pub snippet: Option<String>,
    pub weight: f64,
}

/// One scoring pass over one transcript. History is append-only;
/// consumers read the latest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRun {
    pub transcript_id: String,
    /// 0–100, one decimal place; higher is worse.
    pub score: f64,
    pub severity_band: SeverityBand,
    pub has_critical: bool,
    /// Unix epoch seconds.
    pub run_at: u64,
    /// Narrative reason for the outcome: LLM summary or the
    /// deterministic rule-based fallback. Never empty for a stored run.
    pub outcome_summary: Option<String>,
}
