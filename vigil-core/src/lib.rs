//! vigil-core: shared foundation for the Vigil audit engine.
//!
//! - Model: transcripts, findings, audit runs, overrides, DPA telemetry
//! - Errors: one enum per subsystem, `thiserror` only
//! - Config: explicit `AuditConfig`, layered resolution, no ambient state

pub mod config;
pub mod errors;
pub mod model;

pub use config::{AuditConfig, ProcessConfig, ScoringConfig, SummaryConfig};
pub use errors::{CatalogError, ConfigError, PipelineError, StorageError, SummaryError};
pub use model::{
    AuditRun, DpaEvent, DpaMetrics, Finding, Language, OverrideRecord, Persona, RiskLevel,
    Segment, Severity, SeverityBand, Speaker, Transcript, Turn,
};
