use serde::{Deserialize, Serialize};

/// Simulated agent role. Each persona has its own applicable rule subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Regulated collections agent, customer-facing calls.
    Collections,
    /// Relationship account manager, dealer-facing calls.
    Ram,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collections => "collections",
            Self::Ram => "ram",
        }
    }
}

/// Transcript language. Rule phrase sets are language-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    Es,
}

/// Who is speaking in a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Agent,
    /// The other party: a customer for Collections, a dealer contact for RAM.
    Customer,
}

/// Coarse call phase. Rules may scope their search window to one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Greeting,
    Verification,
    Negotiation,
    Closing,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Verification => "verification",
            Self::Negotiation => "negotiation",
            Self::Closing => "closing",
        }
    }
}

/// Risk level a synthetic scenario was generated to exhibit.
/// Ground truth for tests only; the evaluator never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Good,
    Moderate,
    High,
    Critical,
}

/// One utterance in a transcript. Order is semantically meaningful:
/// rules may require something to occur before or after something else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub segment: Segment,
}

impl Turn {
    pub fn new(speaker: Speaker, segment: Segment, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            segment,
        }
    }
}

/// The unit of audit. Created once by the generator (or a test fixture),
/// immutable thereafter; re-audits append new audit-run rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,
    pub persona: Persona,
    pub language: Language,
    pub intended_risk_level: RiskLevel,
    pub scenario_id: String,
    /// Rule ids the generator intended to trigger — a test oracle.
    pub expected_findings: Vec<String>,
    pub turns: Vec<Turn>,
    /// Unix epoch seconds.
    pub created_at: u64,
}

impl Transcript {
    /// True if at least one turn carries the given segment label.
    pub fn has_segment(&self, segment: Segment) -> bool {
        self.turns.iter().any(|t| t.segment == segment)
    }
}
