// Wheel of Doom Type Definitions

use candid::{CandidType, Deserialize};
use ic_stable_structures::{storable::Bound, Storable};
use serde::Serialize;
use std::borrow::Cow;

use crate::cues::SpinCue;

// =============================================================================
// CONSTANTS
// =============================================================================

pub const MAX_NAME_LEN: usize = 40; // Entry names longer than this are rejected
pub const DEFAULT_RESULT_LIMIT: u64 = 50; // History page size when none is given
pub const ANONYMOUS_IDENTITY: &str = "anonymous";

// =============================================================================
// WHEEL TYPES
// =============================================================================

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Entry {
    pub name: String,
    pub added_by: String,
    pub added_at: u64, // nanoseconds
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SpinResult {
    pub selected_name: String,
    pub spun_by: String,
    pub spun_at: u64, // nanoseconds
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct NameStats {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

/// Everything one server-driven spin produced: the recorded result plus the
/// animation data a client needs to replay the wheel in sync with it.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct SpinOutcome {
    pub winner: Entry,
    pub message: String,
    pub winning_index: u32,
    pub final_rotation: f64,
    pub duration_ms: u64,
    pub result: SpinResult,
    pub randomness_hash: String,
    pub cues: Vec<SpinCue>,
}

// =============================================================================
// STORED FORMS
// =============================================================================

/// Registry row. The entry name is the map key, so only the remaining
/// fields are stored here.
#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct StoredEntry {
    pub added_by: String,
    pub added_at: u64,
}

impl Storable for StoredEntry {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(candid::encode_one(self).expect(
            "CRITICAL: Failed to encode StoredEntry. \
             This should never happen unless there's a bug in candid serialization.",
        ))
    }

    fn into_bytes(self) -> Vec<u8> {
        self.to_bytes().into_owned()
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        candid::decode_one(&bytes).expect(
            "CRITICAL: Failed to decode StoredEntry from stable storage. \
             This indicates storage corruption or an incompatible canister upgrade.",
        )
    }

    // added_by is a principal text or SWA user name, well under this
    const BOUND: Bound = Bound::Bounded {
        max_size: 256,
        is_fixed_size: false,
    };
}

/// Ledger row. The inverted-timestamp key lives on the map; the row keeps
/// the full record so reads never need to reverse the key math.
#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct StoredResult {
    pub selected_name: String,
    pub spun_by: String,
    pub spun_at: u64,
}

impl Storable for StoredResult {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(
            candid::encode_one(self)
                .expect("CRITICAL: Failed to encode StoredResult."),
        )
    }

    fn into_bytes(self) -> Vec<u8> {
        self.to_bytes().into_owned()
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        candid::decode_one(&bytes)
            .expect("CRITICAL: Failed to decode StoredResult from stable storage.")
    }

    const BOUND: Bound = Bound::Bounded {
        max_size: 512,
        is_fixed_size: false,
    };
}
