//! Wheel of Doom Backend
//!
//! **Design Philosophy:**
//! A raffle wheel with a server-decided spin: the canister draws the
//! randomness, replays the wheel animation deterministically, records the
//! winner in an append-only ledger, and hands the client everything it
//! needs (duration, final rotation, cue track) to render the exact same
//! spin it just resolved.
//!
//! **Transparency & Fairness:**
//! - Randomness: IC VRF (raw_rand) - no fallback
//! - Each entry wins with probability exactly 1/N (uniform fractional
//!   revolution over equal sectors)
//! - Every spin returns a randomness hash for audit
//!
//! **Error convention:**
//! Prefix-coded error strings (`INVALID_NAME|...`, `NOT_FOUND|...`,
//! `NO_ENTRIES|...`) so HTTP-facing glue can map codes to 400/404 and
//! everything else to 500.

use candid::Principal;
use ic_cdk::management_canister::raw_rand;
use ic_cdk::{init, post_upgrade, pre_upgrade, query, update};
use ic_stable_structures::memory_manager::{MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;
use std::cell::RefCell;

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod colors;
pub mod cues;
pub mod engine;
pub mod ledger;
mod memory_ids;
pub mod random;
pub mod registry;
pub mod statistics;
pub mod types;

pub use types::*;

use cues::CueTrack;
use engine::{SpinDraw, SpinEngine, FRAME_MS};

// ============================================================================
// MEMORY MANAGEMENT
// ============================================================================

pub type Memory = VirtualMemory<DefaultMemoryImpl>;

thread_local! {
    pub static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> =
        RefCell::new(MemoryManager::init(DefaultMemoryImpl::default()));

    // The engine is volatile by design: only the dial position lives here,
    // and a fresh wheel at rotation 0 after an upgrade is harmless.
    static ENGINE: RefCell<SpinEngine> = RefCell::new(SpinEngine::new());
}

// ============================================================================
// LIFECYCLE HOOKS
// ============================================================================

#[init]
fn init() {
    ic_cdk::println!("Wheel of Doom Backend Initialized");
}

#[pre_upgrade]
fn pre_upgrade() {
    // StableBTreeMap persists automatically; the engine dial resets to 0
}

#[post_upgrade]
fn post_upgrade() {
    ic_cdk::println!("Post-upgrade: registry and ledger restored from stable memory");
}

// ============================================================================
// CALLER IDENTITY
// ============================================================================

/// Identity string recorded as added_by/spun_by. The anonymous principal
/// maps to the literal "anonymous"; identity never blocks an operation.
fn caller_identity() -> String {
    let caller = ic_cdk::api::msg_caller();
    if caller == Principal::anonymous() {
        ANONYMOUS_IDENTITY.to_string()
    } else {
        caller.to_text()
    }
}

// ============================================================================
// ENTRY REGISTRY ENDPOINTS
// ============================================================================

/// All entries on the wheel, name-ascending.
#[query]
fn list_entries() -> Vec<Entry> {
    registry::list()
}

/// Add a name (insert-or-replace). Rejects blank or over-long names.
#[update]
fn add_entry(name: String) -> Result<Entry, String> {
    let entry = registry::add(&name, caller_identity(), ic_cdk::api::time())?;
    ic_cdk::println!("Entry added: {} by {}", entry.name, entry.added_by);
    Ok(entry)
}

/// Remove a name. The registry delete itself is idempotent; this boundary
/// reports a missing name as NOT_FOUND so clients can distinguish it.
#[update]
fn delete_entry(name: String) -> Result<(), String> {
    if registry::remove(&name) {
        ic_cdk::println!("Entry deleted: {}", name);
        Ok(())
    } else {
        Err(format!("NOT_FOUND|Entry not found: {}", name))
    }
}

// ============================================================================
// SPIN ENDPOINT
// ============================================================================

/// Spin the wheel: draw VRF randomness, replay the animation to its end,
/// record the winner, and return the full outcome with the cue track.
#[update]
async fn spin() -> Result<SpinOutcome, String> {
    let entries = registry::list();
    if entries.is_empty() {
        return Err("NO_ENTRIES|Add names to the wheel before spinning".to_string());
    }

    // 1. VRF randomness (async - no state has been touched yet)
    let random_bytes = raw_rand()
        .await
        .map_err(|e| format!("Randomness unavailable: {:?}", e))?;
    let randomness_hash = random::create_randomness_hash(&random_bytes);
    let draw = SpinDraw::from_bytes(&random_bytes)?;

    // 2. Replay the spin timeline synchronously, collecting cues
    let now = ic_cdk::api::time();
    let now_ms = now / 1_000_000;

    let (winner, winning_index, final_rotation, duration_ms, cues) = ENGINE.with(|engine| {
        let mut engine = engine.borrow_mut();
        let mut track = CueTrack::new();

        // The engine only refuses a start if a previous spin never reset;
        // updates run sequentially so that cannot happen, but don't trap on it.
        engine.reset();
        if !engine.start_spin(&entries, &draw, now_ms, &mut track) {
            return Err("SPIN_IN_PROGRESS|The wheel is already spinning".to_string());
        }

        let winner = engine
            .run_to_completion(FRAME_MS, &mut track)
            .ok_or_else(|| "Spin failed to complete".to_string())?;
        let winning_index = engine.winning_index().unwrap_or(0) as u32;
        let final_rotation = engine.rotation();
        let duration_ms = engine.duration_ms().unwrap_or(0);
        engine.reset();

        Ok((winner, winning_index, final_rotation, duration_ms, track.finish()))
    })?;

    // 3. Record the result; history is append-only
    let spun_by = caller_identity();
    let result = ledger::append(winner.name.clone(), spun_by, now);

    ic_cdk::println!(
        "Spin complete: {} selected after {} ms (hash {})",
        winner.name,
        duration_ms,
        &randomness_hash[..8]
    );

    Ok(SpinOutcome {
        winner,
        message: engine::DRAMATIC_MESSAGES[draw.message_index].to_string(),
        winning_index,
        final_rotation,
        duration_ms,
        result,
        randomness_hash,
        cues,
    })
}

// ============================================================================
// RESULT LEDGER ENDPOINTS
// ============================================================================

/// Most recent results, newest first (default page of 50).
#[query]
fn list_results(limit: Option<u64>) -> Vec<SpinResult> {
    ledger::list(limit.unwrap_or(DEFAULT_RESULT_LIMIT))
}

/// Record a result decided by a client-side wheel (the POST /results
/// compatibility path). The name is trimmed but deliberately not required
/// to be on the wheel: the entry may have been deleted since the spin.
#[update]
fn record_result(name: String) -> Result<SpinResult, String> {
    let selected_name = registry::validate_name(&name)?;
    let result = ledger::append(selected_name, caller_identity(), ic_cdk::api::time());
    ic_cdk::println!("Result recorded: {} by {}", result.selected_name, result.spun_by);
    Ok(result)
}

// ============================================================================
// STATISTICS ENDPOINTS
// ============================================================================

/// Selection frequencies over the most recent results (same default page
/// the history view shows), count-descending, ties name-ascending.
#[query]
fn get_statistics(limit: Option<u64>) -> Vec<NameStats> {
    let results = ledger::list(limit.unwrap_or(DEFAULT_RESULT_LIMIT));
    statistics::aggregate(&results)
}

#[query]
fn get_result_count() -> u64 {
    ledger::len()
}

// ============================================================================
// PRESENTATION QUERY ENDPOINTS
// ============================================================================

/// The shared wheel/statistics palette.
#[query]
fn get_palette() -> Vec<String> {
    colors::COLORS.iter().map(|c| c.to_string()).collect()
}

/// Deterministic color for a name, identical on every client.
#[query]
fn get_color_for_name(name: String) -> String {
    colors::color_for_name(&name).to_string()
}

/// Greet a player
#[query]
fn greet(name: String) -> String {
    format!(
        "Welcome to the Wheel of Doom, {}! Add your victims and spin.",
        name
    )
}

ic_cdk::export_candid!();
