//! Explicit configuration object, threaded into constructors.
//! No process-global state; thresholds are consumed read-only by the
//! rule catalog, evaluators, and report layer.

pub mod audit_config;

pub use audit_config::{
    AuditConfig, EvaluatorConfig, ProcessConfig, ScoringConfig, SummaryConfig,
};
