//! Weighted scoring: aggregate findings into a single score and
//! severity band.
//!
//! Score 0 is best, 100 is worst. The denominator is the weight of the
//! findings actually evaluated, not the full catalog: rules skipped as
//! inapplicable contribute to neither side of the division.

use vigil_core::model::{Finding, Severity, SeverityBand};

/// Aggregated outcome of one finding set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOutcome {
    /// Unrounded, in [0, 100]. Use `display_score` for presentation.
    pub score: f64,
    pub band: SeverityBand,
    pub has_critical: bool,
}

/// Aggregate findings into (score, band, has_critical).
///
/// A single failed critical finding forces the band to `critical`
/// regardless of the numeric score. With no evaluated weight the score
/// is 0 and the band `good`, never an error.
pub fn score_findings(findings: &[Finding]) -> ScoreOutcome {
    let mut raw = 0.0;
    let mut max_possible = 0.0;
    let mut has_critical = false;

    for f in findings {
        max_possible += f.weight;
        if !f.passed {
            raw += f.weight;
            if f.severity == Severity::Critical {
                has_critical = true;
            }
        }
    }

    let score = if max_possible > 0.0 {
        100.0 * raw / max_possible
    } else {
        0.0
    };

    ScoreOutcome {
        score,
        band: band_for_score(score, has_critical),
        has_critical,
    }
}

/// Band thresholds on the unrounded score: [0,25) good, [25,50)
/// moderate, [50,100] high — unless a critical failure overrides.
pub fn band_for_score(score: f64, has_critical: bool) -> SeverityBand {
    if has_critical {
        return SeverityBand::Critical;
    }
    if score >= 50.0 {
        SeverityBand::High
    } else if score >= 25.0 {
        SeverityBand::Moderate
    } else {
        SeverityBand::Good
    }
}

/// Round to one decimal place for display and persistence. Banding
/// always uses the unrounded score to avoid boundary flapping.
pub fn display_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}
