//! vigil-analysis: the audit engine.
//!
//! - Catalog: declarative rules over a closed set of detection strategies
//! - Evaluate: transcript and process evaluators producing findings
//! - Scoring: weighted aggregation into (score, band, has_critical)
//! - Pipeline: the audit orchestrator, with atomic persistence
//! - Summary: optional LLM narrative with a deterministic fallback
//! - Dpa: event->metrics reduction and synthetic telemetry
//! - Synthetic: scenario-driven transcript generation
//! - Report: actionable filtering and override-aware views

pub mod catalog;
pub mod dpa;
pub mod evaluate;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod summary;
pub mod synthetic;

pub use catalog::{AppliesTo, Detection, PhraseSet, Rule, RuleCatalog, RuleCategory};
pub use evaluate::{ProcessEvaluator, ProcessOutcome, TranscriptEvaluator};
pub use pipeline::{AuditOutcome, AuditPipeline, Evaluation};
pub use scoring::{score_findings, ScoreOutcome};
pub use summary::{ChatSummarizer, RuleBasedSummarizer, Summarizer};
