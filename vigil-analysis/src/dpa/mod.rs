//! Desktop Process Analytics: reduce raw screen events into idle/dwell
//! metrics, and synthesize event walks for simulated calls.
//!
//! Idle is time before the first event, after the last event, and the
//! portion of any inter-event gap beyond the activity window
//! (`gap_threshold_sec`). Dwell per screen is the full time from a
//! screen-entry event to the next event; the last event contributes no
//! dwell. Idle spans are disjoint, so `idle_ratio` stays in [0, 1] by
//! construction.

use std::collections::BTreeMap;

use vigil_core::model::{DpaEvent, DpaMetrics, Persona, Transcript};
use xxhash_rust::xxh3::xxh3_64;

/// Screens an agent walks through, by persona.
const COLLECTIONS_SCREENS: &[&str] = &[
    "login",
    "account_summary",
    "payment",
    "disclosure",
    "notes",
    "wrap_up",
];
const RAM_SCREENS: &[&str] = &[
    "login",
    "dealer_lookup",
    "documentation",
    "disclosure",
    "notes",
    "wrap_up",
];

const SEC_PER_TURN: f64 = 25.0;
const MIN_CALL_SEC: f64 = 60.0;
const MAX_CALL_SEC: f64 = 600.0;

/// Bias applied to a synthetic event walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpaBias {
    Normal,
    HighIdle,
    HighDwell,
}

/// Infer call duration from transcript length.
pub fn call_duration_for(transcript: &Transcript) -> f64 {
    let n = transcript.turns.len().max(1) as f64;
    (n * SEC_PER_TURN).clamp(MIN_CALL_SEC, MAX_CALL_SEC)
}

/// Reduce an event sequence to metrics. Events are sorted and clamped
/// into the call window; the result is rounded the same way every run,
/// so re-reduction is byte-identical.
pub fn reduce_events(
    transcript_id: &str,
    events: &[DpaEvent],
    call_duration_sec: f64,
    gap_threshold_sec: f64,
) -> DpaMetrics {
    let mut timeline: Vec<(f64, &str)> = events
        .iter()
        .filter(|e| e.timestamp_sec >= 0.0 && e.timestamp_sec <= call_duration_sec)
        .map(|e| (e.timestamp_sec, e.screen_id.as_str()))
        .collect();
    timeline.sort_by(|a, b| a.0.total_cmp(&b.0));

    if timeline.is_empty() {
        return DpaMetrics {
            transcript_id: transcript_id.to_string(),
            call_duration_sec,
            idle_sec: round1(call_duration_sec),
            idle_ratio: if call_duration_sec > 0.0 { 1.0 } else { 0.0 },
            max_dwell_sec: 0.0,
            dwell_by_screen: BTreeMap::new(),
        };
    }

    let first_ts = timeline[0].0;
    let last_ts = timeline[timeline.len() - 1].0;

    let mut idle_sec = first_ts + (call_duration_sec - last_ts);
    let mut dwell_by_screen: BTreeMap<String, f64> = BTreeMap::new();
    for pair in timeline.windows(2) {
        let (ts, screen) = pair[0];
        let gap = pair[1].0 - ts;
        if gap <= 0.0 {
            continue;
        }
        *dwell_by_screen.entry(screen.to_string()).or_insert(0.0) += gap;
        if gap > gap_threshold_sec {
            idle_sec += gap - gap_threshold_sec;
        }
    }

    for value in dwell_by_screen.values_mut() {
        *value = round1(*value);
    }
    let max_dwell_sec = dwell_by_screen.values().copied().fold(0.0, f64::max);
    let idle_ratio = if call_duration_sec > 0.0 {
        (idle_sec / call_duration_sec).clamp(0.0, 1.0)
    } else {
        0.0
    };

    DpaMetrics {
        transcript_id: transcript_id.to_string(),
        call_duration_sec,
        idle_sec: round1(idle_sec),
        idle_ratio: round3(idle_ratio),
        max_dwell_sec,
        dwell_by_screen,
    }
}

/// Synthesize an event walk. Deterministic: the sequence is seeded from
/// the transcript id, so regeneration reproduces the same telemetry.
pub fn synthesize_events(
    transcript_id: &str,
    persona: Persona,
    call_duration_sec: f64,
    bias: DpaBias,
) -> Vec<DpaEvent> {
    let screens = match persona {
        Persona::Collections => COLLECTIONS_SCREENS,
        Persona::Ram => RAM_SCREENS,
    };
    let mut rng = SeededRng::new(xxh3_64(transcript_id.as_bytes()));
    let mut events = Vec::new();
    let mut push = |t: f64, screen: &str| {
        events.push(DpaEvent {
            transcript_id: transcript_id.to_string(),
            timestamp_sec: (t * 10.0).round() / 10.0,
            screen_id: screen.to_string(),
        });
    };

    match bias {
        DpaBias::Normal => {
            // Dense walk: gaps stay inside the activity window, so only
            // the call edges contribute idle.
            let mut t = rng.range(4.0, 10.0);
            let mut i = 0usize;
            while t < call_duration_sec - 8.0 {
                push(t, screens[i % screens.len()]);
                t += rng.range(8.0, 18.0);
                i += 1;
            }
        }
        DpaBias::HighIdle => {
            // Long dead air at the start, then sparse activity.
            let mut t = rng.range(0.25, 0.40) * call_duration_sec;
            for i in 0..4 {
                if t >= call_duration_sec - 5.0 {
                    break;
                }
                push(t, screens[i % screens.len()]);
                t += rng.range(0.15, 0.25) * call_duration_sec;
            }
        }
        DpaBias::HighDwell => {
            // Normal start, then one screen held far past the dwell
            // threshold, then a short wrap-up.
            let mut t = rng.range(5.0, 15.0);
            push(t, screens[0]);
            t += rng.range(15.0, 25.0);
            push(t, screens[1]);
            let hold = (0.55 * call_duration_sec).max(310.0);
            t += hold.min(call_duration_sec - t - 30.0);
            push(t, screens[4]);
            t += rng.range(10.0, 20.0);
            if t < call_duration_sec - 5.0 {
                push(t, screens[5]);
            }
        }
    }
    events
}

/// Synthesize events and reduce them in one step. High-dwell walks need
/// room for the hold, so the duration is stretched when necessary.
pub fn synthesize_metrics(
    transcript: &Transcript,
    bias: DpaBias,
    gap_threshold_sec: f64,
) -> (Vec<DpaEvent>, DpaMetrics) {
    let mut duration = call_duration_for(transcript);
    if bias == DpaBias::HighDwell {
        duration = duration.max(480.0);
    }
    let events = synthesize_events(&transcript.id, transcript.persona, duration, bias);
    let metrics = reduce_events(&transcript.id, &events, duration, gap_threshold_sec);
    (events, metrics)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Small deterministic generator (splitmix64). Seeding from the
/// transcript id keeps synthetic telemetry reproducible across runs and
/// platforms.
struct SeededRng {
    state: u64,
}

impl SeededRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}
