//! Declarative rule model. Evaluation is driven entirely by the
//! `Detection` variant; adding a rule is a catalog change, not an
//! evaluator change.

use serde::{Deserialize, Serialize};
use vigil_core::model::{Language, Persona, Segment, Severity, Speaker};

/// Which evaluator a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Transcript,
    Process,
}

/// Persona applicability of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliesTo {
    #[default]
    All,
    Personas(Vec<Persona>),
}

impl AppliesTo {
    pub fn includes(&self, persona: Persona) -> bool {
        match self {
            Self::All => true,
            Self::Personas(list) => list.contains(&persona),
        }
    }
}

/// Language-specific trigger phrases. Matching is case-insensitive; the
/// set for the transcript's language is the one consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSet {
    pub en: Vec<String>,
    pub es: Vec<String>,
}

impl PhraseSet {
    pub fn for_language(&self, language: Language) -> &[String] {
        match language {
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }
}

/// The closed set of detection strategies. Each is a deterministic,
/// side-effect-free function of (rule config, transcript or metrics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Detection {
    /// At least one turn (optionally restricted by segment and/or
    /// speaker) must contain a trigger phrase. With `forbidden`, the
    /// polarity flips: presence is the violation.
    Presence {
        #[serde(default)]
        speaker: Option<Speaker>,
        #[serde(default)]
        segment: Option<Segment>,
        phrases: PhraseSet,
        #[serde(default)]
        forbidden: bool,
    },
    /// The first occurrence of any `first` phrase must precede the
    /// first occurrence of any `then` phrase. Passes when `then` never
    /// occurs.
    Ordering { first: PhraseSet, then: PhraseSet },
    /// The number of turns by `speaker` containing any lexicon term
    /// must not exceed `max_turns`.
    Lexicon {
        speaker: Speaker,
        terms: PhraseSet,
        max_turns: u32,
    },
    /// `idle_ratio` must not exceed `max_ratio`.
    IdleRatio { max_ratio: f64 },
    /// The metrics' `max_dwell_sec` must not exceed the threshold.
    Dwell { max_dwell_sec: f64 },
}

impl Detection {
    pub fn category(&self) -> RuleCategory {
        match self {
            Self::Presence { .. } | Self::Ordering { .. } | Self::Lexicon { .. } => {
                RuleCategory::Transcript
            }
            Self::IdleRatio { .. } | Self::Dwell { .. } => RuleCategory::Process,
        }
    }
}

/// One checkable condition. `weight` contributes to the score when the
/// rule fails; `severity` feeds banding, with `critical` able to force
/// the band regardless of score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub applies_to: AppliesTo,
    pub severity: Severity,
    pub weight: f64,
    pub description: String,
    pub detection: Detection,
}

impl Rule {
    pub fn category(&self) -> RuleCategory {
        self.detection.category()
    }
}
