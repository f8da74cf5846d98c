// Spin engine: the animated selection state machine.
//
// The engine is deliberately free of canister APIs. It is driven by an
// explicit clock (`advance(now_ms)`) and a randomness draw fixed at spin
// start, so the same code runs inside the `spin` endpoint and inside
// native tests with a seeded RNG.
//
// Animation model (matching the original wheel exactly):
// - total rotation = current dial position + 2π × (5 + uniform(0,5))
// - duration        = 5000 + uniform(0,2000) ms
// - easing          = 1 - (1 - t)^4, a long deceleration tail
// - pointer fixed at angle 0; segments are drawn in the rotating frame,
//   so the apparent winner moves opposite to the rotation direction and
//   the final index must be computed with the inversion in
//   `winning_index`. Changing that formula biases selection toward a
//   neighbor segment.

use std::f64::consts::TAU;

use crate::random;
use crate::types::Entry;

// =============================================================================
// CONSTANTS
// =============================================================================

pub const MIN_REVOLUTIONS: f64 = 5.0;
pub const REVOLUTION_SPREAD: f64 = 5.0;
pub const MIN_DURATION_MS: u64 = 5_000;
pub const DURATION_SPREAD_MS: u64 = 2_000;
pub const FRAME_MS: u64 = 16; // ~60fps replay cadence

const EASE_EXPONENT: i32 = 4;

// Wobble tail: a decaying oscillation over the last 10% of progress that
// settles to exactly zero at t = 1, so it never moves the resting rotation.
const WOBBLE_START: f64 = 0.9;
const WOBBLE_AMPLITUDE: f64 = 0.006; // radians, well under any sector width
const WOBBLE_CYCLES: f64 = 3.0;

// Countdown cues near the end of the spin, each fired at most once.
const COUNTDOWN_THRESHOLDS: [(f64, u8); 3] = [(0.90, 3), (0.95, 2), (0.98, 1)];

pub const DRAMATIC_MESSAGES: [&str; 8] = [
    "The Wheel has spoken!",
    "Fate has decided...",
    "Today's victim is...",
    "The chosen one is...",
    "No escape for...",
    "Destiny calls upon...",
    "The odds have chosen...",
    "Fortune favors...",
];

// =============================================================================
// OBSERVER CONTRACT
// =============================================================================

/// Consumer of engine events (sound, vibration, UI cues). Observers never
/// call back into the engine; all methods default to no-ops.
pub trait SpinObserver {
    fn on_spin_start(&mut self) {}
    /// `speed` is 1 - eased progress: near 1.0 for early ticks, near 0.0
    /// for the slow final clicks.
    fn on_tick(&mut self, _speed: f64) {}
    /// Fired once each at progress 0.90 / 0.95 / 0.98 with n = 3 / 2 / 1.
    fn on_countdown(&mut self, _n: u8) {}
    fn on_spin_complete(&mut self, _winner: &Entry, _message: &str) {}
}

pub struct NullObserver;

impl SpinObserver for NullObserver {}

// =============================================================================
// RANDOMNESS DRAW
// =============================================================================

/// All randomness for one spin, fixed before the animation starts.
#[derive(Clone, Debug)]
pub struct SpinDraw {
    /// Fraction of the extra revolutions beyond the minimum 5, in [0, 1).
    pub revolution_fraction: f64,
    /// Fraction of the 2000 ms duration spread, in [0, 1).
    pub duration_fraction: f64,
    /// Which flavor message the completion event carries.
    pub message_index: usize,
}

impl SpinDraw {
    /// Build a draw from VRF bytes (the `spin` endpoint path).
    pub fn from_bytes(vrf_bytes: &[u8]) -> Result<Self, String> {
        let revolution_fraction = random::bytes_to_float(vrf_bytes)?;
        let duration_fraction = random::derive_sub_float(vrf_bytes, 0)?;
        let message_float = random::derive_sub_float(vrf_bytes, 1)?;
        let message_index = (message_float * DRAMATIC_MESSAGES.len() as f64) as usize;

        Ok(Self {
            revolution_fraction,
            duration_fraction,
            message_index: message_index % DRAMATIC_MESSAGES.len(),
        })
    }

    /// Build a draw from plain fractions (the seeded-test path).
    pub fn from_fractions(revolution_fraction: f64, duration_fraction: f64, message_index: usize) -> Self {
        Self {
            revolution_fraction: revolution_fraction.clamp(0.0, 0.999_999),
            duration_fraction: duration_fraction.clamp(0.0, 0.999_999),
            message_index: message_index % DRAMATIC_MESSAGES.len(),
        }
    }
}

// =============================================================================
// STATE MACHINE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
    Completed,
}

/// Ephemeral per-spin state; discarded on `reset`.
struct ActiveSpin {
    entries: Vec<Entry>,
    start_rotation: f64,
    target_rotation: f64,
    started_at_ms: u64,
    duration_ms: u64,
    message: &'static str,
    last_tick_segment: i64,
    countdowns_fired: [bool; 3],
    winning_index: Option<usize>,
}

pub struct SpinEngine {
    /// Resting dial position, carried across spins so each spin visibly
    /// continues from where the last one stopped.
    rotation: f64,
    spin: Option<ActiveSpin>,
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinEngine {
    pub fn new() -> Self {
        Self {
            rotation: 0.0,
            spin: None,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        match &self.spin {
            None => SpinPhase::Idle,
            Some(spin) if spin.winning_index.is_some() => SpinPhase::Completed,
            Some(_) => SpinPhase::Spinning,
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn winner(&self) -> Option<&Entry> {
        self.spin
            .as_ref()
            .and_then(|spin| spin.winning_index.map(|i| &spin.entries[i]))
    }

    pub fn winning_index(&self) -> Option<usize> {
        self.spin.as_ref().and_then(|spin| spin.winning_index)
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.spin.as_ref().map(|spin| spin.duration_ms)
    }

    /// Start a spin. A silent no-op unless the engine is Idle and the entry
    /// list is non-empty: spinning again mid-flight is a UX debounce, not an
    /// error. Returns whether a spin actually started.
    pub fn start_spin(
        &mut self,
        entries: &[Entry],
        draw: &SpinDraw,
        now_ms: u64,
        observer: &mut impl SpinObserver,
    ) -> bool {
        if entries.is_empty() || self.spin.is_some() {
            return false;
        }

        let extra_revolutions = MIN_REVOLUTIONS + REVOLUTION_SPREAD * draw.revolution_fraction;
        let target_rotation = self.rotation + TAU * extra_revolutions;
        let duration_ms =
            MIN_DURATION_MS + (DURATION_SPREAD_MS as f64 * draw.duration_fraction) as u64;

        self.spin = Some(ActiveSpin {
            entries: entries.to_vec(),
            start_rotation: self.rotation,
            target_rotation,
            started_at_ms: now_ms,
            duration_ms,
            message: DRAMATIC_MESSAGES[draw.message_index % DRAMATIC_MESSAGES.len()],
            last_tick_segment: -1,
            countdowns_fired: [false; 3],
            winning_index: None,
        });

        observer.on_spin_start();
        true
    }

    /// Advance the animation to `now_ms`. Call once per frame while
    /// Spinning; calling while Idle or after completion changes nothing and
    /// re-emits nothing.
    pub fn advance(&mut self, now_ms: u64, observer: &mut impl SpinObserver) -> SpinPhase {
        let Some(spin) = self.spin.as_mut() else {
            return SpinPhase::Idle;
        };
        if spin.winning_index.is_some() {
            return SpinPhase::Completed;
        }

        let elapsed = now_ms.saturating_sub(spin.started_at_ms);
        let progress = (elapsed as f64 / spin.duration_ms as f64).min(1.0);
        let eased = 1.0 - (1.0 - progress).powi(EASE_EXPONENT);

        let mut rotation =
            spin.start_rotation + (spin.target_rotation - spin.start_rotation) * eased;
        if progress >= WOBBLE_START && progress < 1.0 {
            rotation += wobble_offset(progress);
        }
        self.rotation = rotation;

        for (slot, (threshold, n)) in COUNTDOWN_THRESHOLDS.iter().enumerate() {
            if progress >= *threshold && !spin.countdowns_fired[slot] {
                spin.countdowns_fired[slot] = true;
                observer.on_countdown(*n);
            }
        }

        let sector = TAU / spin.entries.len() as f64;
        let segment = (normalize_rotation(rotation) / sector) as i64;
        if segment != spin.last_tick_segment {
            spin.last_tick_segment = segment;
            observer.on_tick((1.0 - eased).clamp(0.0, 1.0));
        }

        if progress >= 1.0 {
            // Settle exactly on the target; the wobble is zero here by
            // construction so the winner only depends on the draw.
            self.rotation = spin.target_rotation;
            let index = winning_index(spin.target_rotation, spin.entries.len());
            spin.winning_index = Some(index);
            observer.on_spin_complete(&spin.entries[index], spin.message);
            return SpinPhase::Completed;
        }

        SpinPhase::Spinning
    }

    /// Replay the whole timeline at a fixed frame cadence. The canister has
    /// no animation frames, so the `spin` endpoint uses this to run the
    /// animation synchronously; tests use it with a 1 ms cadence.
    pub fn run_to_completion(
        &mut self,
        frame_ms: u64,
        observer: &mut impl SpinObserver,
    ) -> Option<Entry> {
        let started_at_ms = match &self.spin {
            Some(spin) if spin.winning_index.is_none() => spin.started_at_ms,
            _ => return self.winner().cloned(),
        };

        let step = frame_ms.max(1);
        let mut now_ms = started_at_ms;
        loop {
            now_ms += step;
            if self.advance(now_ms, observer) == SpinPhase::Completed {
                break;
            }
        }
        self.winner().cloned()
    }

    /// Completed → Idle. The dial position survives; the per-spin state is
    /// discarded. A live spin cannot be cancelled, so reset while Spinning
    /// is a no-op like every other invalid call.
    pub fn reset(&mut self) {
        if self.phase() == SpinPhase::Completed {
            self.spin = None;
        }
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Normalize a rotation into [0, 2π).
pub fn normalize_rotation(rotation: f64) -> f64 {
    rotation.rem_euclid(TAU)
}

/// Which segment sits under the fixed pointer at angle 0.
///
/// Segments are painted in the rotating frame starting at angle 0, so the
/// segment visible at the stationary pointer moves opposite to the rotation:
/// `floor(((2π - normalized) mod 2π) / sector) mod N`.
pub fn winning_index(final_rotation: f64, segment_count: usize) -> usize {
    debug_assert!(segment_count > 0);
    let normalized = normalize_rotation(final_rotation);
    let sector = TAU / segment_count as f64;
    let inverted = (TAU - normalized).rem_euclid(TAU);
    ((inverted / sector).floor() as usize) % segment_count
}

fn wobble_offset(progress: f64) -> f64 {
    let local = (progress - WOBBLE_START) / (1.0 - WOBBLE_START);
    let amplitude = WOBBLE_AMPLITUDE * (1.0 - local);
    amplitude * (local * WOBBLE_CYCLES * TAU).sin()
}
