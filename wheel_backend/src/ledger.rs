// Result ledger: append-only spin history, newest first.
//
// The map key is the zero-padded inverted timestamp, so the map's natural
// ascending key order is descending time order and a bounded "most recent"
// read is a plain prefix scan. There is no update or delete path: history
// is permanent.

use ic_stable_structures::memory_manager::MemoryId;
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

use crate::memory_ids::RESULTS_MEMORY_ID;
use crate::types::{SpinResult, StoredResult, DEFAULT_RESULT_LIMIT};
use crate::{Memory, MEMORY_MANAGER};

thread_local! {
    static RESULTS: RefCell<StableBTreeMap<String, StoredResult, Memory>> = RefCell::new(
        StableBTreeMap::init(
            MEMORY_MANAGER.with(|m| m.borrow().get(MemoryId::new(RESULTS_MEMORY_ID)))
        )
    );
}

/// Fixed-width key that sorts newest-first: `u64::MAX - spun_at`, zero-padded
/// to the full 20 digits of u64 so lexicographic order equals numeric order.
pub fn inverted_key(spun_at: u64) -> String {
    format!("{:020}", u64::MAX - spun_at)
}

/// Append a result at time `now` (nanoseconds) and return the stored record.
pub fn append(selected_name: String, spun_by: String, now: u64) -> SpinResult {
    RESULTS.with(|results| {
        let mut results = results.borrow_mut();

        // Two spins can land on the same nanosecond within a round; nudge
        // forward until the key is free so neither record is lost.
        let mut spun_at = now;
        while results.contains_key(&inverted_key(spun_at)) {
            spun_at += 1;
        }

        let record = SpinResult {
            selected_name,
            spun_by,
            spun_at,
        };
        results.insert(
            inverted_key(spun_at),
            StoredResult {
                selected_name: record.selected_name.clone(),
                spun_by: record.spun_by.clone(),
                spun_at: record.spun_at,
            },
        );
        record
    })
}

/// Up to `limit` most recent results, newest first.
pub fn list(limit: u64) -> Vec<SpinResult> {
    RESULTS.with(|results| {
        results
            .borrow()
            .iter()
            .take(limit as usize)
            .map(|row| {
                let stored = row.value();
                SpinResult {
                    selected_name: stored.selected_name,
                    spun_by: stored.spun_by,
                    spun_at: stored.spun_at,
                }
            })
            .collect()
    })
}

/// The default history page (the original API returned 50).
pub fn list_default() -> Vec<SpinResult> {
    list(DEFAULT_RESULT_LIMIT)
}

pub fn len() -> u64 {
    RESULTS.with(|results| results.borrow().len())
}
