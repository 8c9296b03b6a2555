//! Scorer properties: weighted aggregation, banding, and the critical
//! override.

use proptest::prelude::*;
use vigil_analysis::scoring::{band_for_score, display_score, score_findings};
use vigil_core::model::{Finding, Severity, SeverityBand};

fn finding(rule_id: &str, passed: bool, severity: Severity, weight: f64) -> Finding {
    Finding {
        transcript_id: "t-1".to_string(),
        rule_id: rule_id.to_string(),
        passed,
        severity,
        reason: "reason".to_string(),
        snippet: None,
        weight,
    }
}

#[test]
fn zero_failed_rules_scores_zero_good() {
    let findings = vec![
        finding("a", true, Severity::High, 20.0),
        finding("b", true, Severity::Critical, 25.0),
    ];
    let outcome = score_findings(&findings);
    assert_eq!(outcome.score, 0.0);
    assert_eq!(outcome.band, SeverityBand::Good);
    assert!(!outcome.has_critical);
}

#[test]
fn empty_finding_set_scores_zero_good_never_errors() {
    let outcome = score_findings(&[]);
    assert_eq!(outcome.score, 0.0);
    assert_eq!(outcome.band, SeverityBand::Good);
    assert!(!outcome.has_critical);
}

#[test]
fn single_failed_process_rule_saturates_score() {
    // high_idle_ratio at weight 10 as the only evaluated rule.
    let findings = vec![finding("high_idle_ratio", false, Severity::Moderate, 10.0)];
    let outcome = score_findings(&findings);
    assert_eq!(outcome.score, 100.0);
    assert_eq!(outcome.band, SeverityBand::High);
    assert!(!outcome.has_critical);
}

#[test]
fn critical_failure_forces_band_regardless_of_score() {
    // Failed weight sums to 37.5 of 100; numerically moderate, but one
    // critical failure must report critical, not moderate.
    let findings = vec![
        finding("a", false, Severity::Critical, 15.0),
        finding("b", false, Severity::Low, 22.5),
        finding("c", true, Severity::High, 62.5),
    ];
    let outcome = score_findings(&findings);
    assert!((outcome.score - 37.5).abs() < 1e-9);
    assert!(outcome.has_critical);
    assert_eq!(outcome.band, SeverityBand::Critical);
}

#[test]
fn critical_on_exact_band_boundary_still_critical() {
    // Score lands exactly on 25.0; without the override this would be
    // the moderate boundary.
    let findings = vec![
        finding("noncrit", false, Severity::Moderate, 5.0),
        finding("crit", false, Severity::Critical, 5.0),
        finding("p1", true, Severity::Low, 10.0),
        finding("p2", true, Severity::High, 20.0),
    ];
    let outcome = score_findings(&findings);
    assert!((outcome.score - 25.0).abs() < 1e-9);
    assert_eq!(outcome.band, SeverityBand::Critical);
}

#[test]
fn low_score_with_critical_is_still_critical() {
    let findings = vec![
        finding("crit", false, Severity::Critical, 1.0),
        finding("p", true, Severity::Low, 99.0),
    ];
    let outcome = score_findings(&findings);
    assert!(outcome.score < 25.0);
    assert_eq!(outcome.band, SeverityBand::Critical);
}

#[test]
fn band_boundaries() {
    assert_eq!(band_for_score(0.0, false), SeverityBand::Good);
    assert_eq!(band_for_score(24.999, false), SeverityBand::Good);
    assert_eq!(band_for_score(25.0, false), SeverityBand::Moderate);
    assert_eq!(band_for_score(49.999, false), SeverityBand::Moderate);
    assert_eq!(band_for_score(50.0, false), SeverityBand::High);
    assert_eq!(band_for_score(100.0, false), SeverityBand::High);
    assert_eq!(band_for_score(0.0, true), SeverityBand::Critical);
}

#[test]
fn banding_uses_unrounded_score() {
    // 124.9 of 250 => 49.96: displays as 50.0 but bands as moderate.
    let findings = vec![
        finding("a", false, Severity::High, 124.9),
        finding("b", true, Severity::Low, 125.1),
    ];
    let outcome = score_findings(&findings);
    assert_eq!(outcome.band, SeverityBand::Moderate);
    assert_eq!(display_score(outcome.score), 50.0);
}

#[test]
fn display_rounds_to_one_decimal() {
    assert_eq!(display_score(33.333_333), 33.3);
    assert_eq!(display_score(66.666_666), 66.7);
    assert_eq!(display_score(0.0), 0.0);
    assert_eq!(display_score(100.0), 100.0);
}

proptest! {
    /// Holding max_possible fixed, failing one more rule never lowers
    /// the score.
    #[test]
    fn score_monotonic_in_failed_weight(
        weights in prop::collection::vec((1u32..=5000u32, any::<bool>()), 1..20),
        flip_index in any::<prop::sample::Index>(),
    ) {
        let findings: Vec<Finding> = weights
            .iter()
            .enumerate()
            .map(|(i, (w, passed))| {
                finding(&format!("r{i}"), *passed, Severity::Low, *w as f64 / 100.0)
            })
            .collect();
        let before = score_findings(&findings);

        let idx = flip_index.index(findings.len());
        let mut flipped = findings.clone();
        flipped[idx].passed = false;
        let after = score_findings(&flipped);

        prop_assert!(after.score >= before.score - 1e-9);
        prop_assert!((0.0..=100.0).contains(&after.score));
    }
}
