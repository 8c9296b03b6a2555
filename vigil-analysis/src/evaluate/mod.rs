//! Evaluators: transcript rules and process-telemetry rules, both
//! producing findings in the same shape.

pub mod phrases;
pub mod process;
pub mod transcript;

pub use process::{ProcessEvaluator, ProcessOutcome};
pub use transcript::TranscriptEvaluator;

/// Truncate quoted evidence to a bounded number of characters, on a
/// char boundary.
pub(crate) fn truncate_snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
