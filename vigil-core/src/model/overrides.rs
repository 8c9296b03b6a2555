use serde::{Deserialize, Serialize};

/// A reviewer's suppression of a finding or a whole transcript.
///
/// Overrides never mutate findings or audit runs; they are consulted at
/// presentation/report time and are void once `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRecord {
    /// Storage row id; `None` before the record is persisted.
    pub id: Option<i64>,
    pub transcript_id: String,
    /// `None` means the override applies to the whole transcript.
    pub finding_id: Option<i64>,
    pub overridden_by: String,
    pub reason: String,
    /// Unix epoch seconds.
    pub created_at: u64,
    /// Unix epoch seconds; `None` means no expiry.
    pub expires_at: Option<u64>,
}

impl OverrideRecord {
    /// Active at `now` — not yet expired.
    pub fn is_active(&self, now: u64) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }

    /// Applies to the whole transcript rather than a single finding.
    pub fn is_transcript_level(&self) -> bool {
        self.finding_id.is_none()
    }
}
