//! Process evaluator: idle/dwell threshold rules over DPA metrics.

use vigil_core::model::{DpaMetrics, Finding};

use crate::catalog::{Detection, Rule, RuleCatalog, RuleCategory};

/// Stored values may diverge from their derived counterparts by at most
/// this much; the reducer rounds to three decimals, so 5e-3 accepts its
/// own output while rejecting genuinely inconsistent records.
const METRIC_EPSILON: f64 = 5e-3;

/// Result of a process evaluation. Missing or structurally invalid
/// metrics are an explicit outcome, never a silent pass.
#[derive(Debug)]
pub enum ProcessOutcome {
    Evaluated(Vec<Finding>),
    Unavailable { reason: String },
}

/// Applies the configured process rules to a metrics record.
pub struct ProcessEvaluator {
    rules: Vec<Rule>,
}

impl ProcessEvaluator {
    pub fn new(catalog: &RuleCatalog) -> Self {
        let rules = catalog
            .rules()
            .iter()
            .filter(|r| r.category() == RuleCategory::Process)
            .cloned()
            .collect();
        Self { rules }
    }

    pub fn evaluate(&self, transcript_id: &str, metrics: Option<&DpaMetrics>) -> ProcessOutcome {
        let Some(metrics) = metrics else {
            return ProcessOutcome::Unavailable {
                reason: "no DPA metrics recorded".to_string(),
            };
        };
        if let Err(reason) = validate_metrics(metrics) {
            return ProcessOutcome::Unavailable { reason };
        }

        let findings = self
            .rules
            .iter()
            .filter_map(|rule| check_rule(rule, transcript_id, metrics))
            .collect();
        ProcessOutcome::Evaluated(findings)
    }
}

fn check_rule(rule: &Rule, transcript_id: &str, metrics: &DpaMetrics) -> Option<Finding> {
    let (passed, reason) = match &rule.detection {
        Detection::IdleRatio { max_ratio } => {
            let measured = metrics.idle_ratio;
            if measured > *max_ratio {
                (
                    false,
                    format!("idle ratio {measured:.2} exceeds threshold {max_ratio:.2}"),
                )
            } else {
                (
                    true,
                    format!("idle ratio {measured:.2} within threshold {max_ratio:.2}"),
                )
            }
        }
        Detection::Dwell { max_dwell_sec } => {
            let measured = metrics.max_dwell_sec;
            if measured > *max_dwell_sec {
                (
                    false,
                    format!("max dwell {measured:.1}s exceeds threshold {max_dwell_sec:.1}s"),
                )
            } else {
                (
                    true,
                    format!("max dwell {measured:.1}s within threshold {max_dwell_sec:.1}s"),
                )
            }
        }
        // Transcript strategies never reach the process evaluator.
        _ => return None,
    };

    Some(Finding {
        transcript_id: transcript_id.to_string(),
        rule_id: rule.id.clone(),
        passed,
        severity: rule.severity,
        reason,
        snippet: None,
        weight: rule.weight,
    })
}

/// Structural validation. The stored `idle_ratio` and `max_dwell_sec`
/// must match the values derived from their parts.
fn validate_metrics(m: &DpaMetrics) -> Result<(), String> {
    if !(m.call_duration_sec > 0.0) {
        return Err(format!(
            "call duration {:.1}s is not positive",
            m.call_duration_sec
        ));
    }
    if m.idle_sec < 0.0 {
        return Err(format!("idle {:.1}s is negative", m.idle_sec));
    }
    if !(0.0..=1.0).contains(&m.idle_ratio) {
        return Err(format!("idle ratio {:.2} outside [0, 1]", m.idle_ratio));
    }
    if (m.idle_ratio - m.derived_idle_ratio()).abs() > METRIC_EPSILON {
        return Err(format!(
            "stored idle ratio {:.3} disagrees with derived {:.3}",
            m.idle_ratio,
            m.derived_idle_ratio()
        ));
    }
    if m.max_dwell_sec < 0.0 || m.dwell_by_screen.values().any(|v| *v < 0.0) {
        return Err("negative dwell duration".to_string());
    }
    if (m.max_dwell_sec - m.derived_max_dwell()).abs() > METRIC_EPSILON {
        return Err(format!(
            "stored max dwell {:.1}s disagrees with derived {:.1}s",
            m.max_dwell_sec,
            m.derived_max_dwell()
        ));
    }
    Ok(())
}
