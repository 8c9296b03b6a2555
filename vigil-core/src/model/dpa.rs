use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One desktop-activity sample: the agent surfaced the given screen at
/// `timestamp_sec` into the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpaEvent {
    pub transcript_id: String,
    pub timestamp_sec: f64,
    pub screen_id: String,
}

/// Derived desktop-telemetry summary for one transcript.
///
/// `idle_ratio` must equal `idle_sec / call_duration_sec` and
/// `max_dwell_sec` must equal the maximum over `dwell_by_screen`; the
/// process evaluator treats divergence as invalid metrics rather than
/// trusting the stored values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpaMetrics {
    pub transcript_id: String,
    pub call_duration_sec: f64,
    pub idle_sec: f64,
    /// Fraction of call duration with no recorded screen activity, in [0,1].
    pub idle_ratio: f64,
    pub max_dwell_sec: f64,
    /// Cumulative seconds per screen. Ordered map so serialization is
    /// deterministic across runs.
    pub dwell_by_screen: BTreeMap<String, f64>,
}

impl DpaMetrics {
    /// Recompute the idle ratio from its parts. Guards the zero-duration
    /// case; callers validate duration separately.
    pub fn derived_idle_ratio(&self) -> f64 {
        if self.call_duration_sec > 0.0 {
            self.idle_sec / self.call_duration_sec
        } else {
            0.0
        }
    }

    /// Recompute the max dwell from the per-screen map.
    pub fn derived_max_dwell(&self) -> f64 {
        self.dwell_by_screen.values().copied().fold(0.0, f64::max)
    }
}
