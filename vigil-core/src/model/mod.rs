//! Domain model shared by the evaluators, scorer, pipeline, and storage.

pub mod dpa;
pub mod finding;
pub mod overrides;
pub mod transcript;

pub use dpa::{DpaEvent, DpaMetrics};
pub use finding::{AuditRun, Finding, Severity, SeverityBand};
pub use overrides::OverrideRecord;
pub use transcript::{Language, Persona, RiskLevel, Segment, Speaker, Transcript, Turn};
