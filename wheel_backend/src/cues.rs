// Presentation cues.
//
// The canister decides the spin; the client renders it. `CueTrack` listens
// to one spin's engine events and turns them into an ordered cue sequence
// the frontend replays against the returned duration and easing (drumroll
// on start, a tick per segment crossing, countdown beats, fanfare on the
// winner). One track is created per spin and consumed by `finish` - there
// is no shared audio state in the canister.

use candid::{CandidType, Deserialize};
use serde::Serialize;

use crate::engine::SpinObserver;
use crate::types::Entry;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub enum SpinCue {
    /// Spin started; begin the drumroll.
    Drumroll,
    /// Segment boundary crossed. Speed is 1.0 for the fastest early ticks
    /// and approaches 0.0 for the final slow clicks.
    Tick { speed: f64 },
    /// Near-end countdown beat: 3, 2, 1.
    Countdown { n: u8 },
    /// Winner settled; stop the drumroll and play the fanfare.
    Fanfare { winner: String },
}

#[derive(Default)]
pub struct CueTrack {
    cues: Vec<SpinCue>,
}

impl CueTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<SpinCue> {
        self.cues
    }
}

impl SpinObserver for CueTrack {
    fn on_spin_start(&mut self) {
        self.cues.push(SpinCue::Drumroll);
    }

    fn on_tick(&mut self, speed: f64) {
        self.cues.push(SpinCue::Tick { speed });
    }

    fn on_countdown(&mut self, n: u8) {
        self.cues.push(SpinCue::Countdown { n });
    }

    fn on_spin_complete(&mut self, winner: &Entry, _message: &str) {
        self.cues.push(SpinCue::Fanfare {
            winner: winner.name.clone(),
        });
    }
}
