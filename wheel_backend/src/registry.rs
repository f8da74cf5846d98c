// Entry registry: the ordered, deduplicated set of names on the wheel.
//
// Keyed by the trimmed name, so the map enforces uniqueness and the
// ascending key order IS the listing order. Adding an existing name
// overwrites the previous row (upsert), never duplicates it.

use ic_stable_structures::memory_manager::MemoryId;
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

use crate::memory_ids::ENTRIES_MEMORY_ID;
use crate::types::{Entry, StoredEntry, MAX_NAME_LEN};
use crate::{Memory, MEMORY_MANAGER};

thread_local! {
    static ENTRIES: RefCell<StableBTreeMap<String, StoredEntry, Memory>> = RefCell::new(
        StableBTreeMap::init(
            MEMORY_MANAGER.with(|m| m.borrow().get(MemoryId::new(ENTRIES_MEMORY_ID)))
        )
    );
}

/// Trim and validate a raw name. All mutations go through this, so the map
/// never holds a blank or over-long key.
pub fn validate_name(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("INVALID_NAME|Name is required".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!(
            "INVALID_NAME|Name must be {} characters or less",
            MAX_NAME_LEN
        ));
    }
    Ok(trimmed.to_string())
}

/// Insert-or-replace by trimmed name. Returns the entry as stored.
pub fn add(raw_name: &str, added_by: String, now: u64) -> Result<Entry, String> {
    let name = validate_name(raw_name)?;

    let entry = Entry {
        name,
        added_by,
        added_at: now,
    };
    ENTRIES.with(|entries| {
        entries.borrow_mut().insert(
            entry.name.clone(),
            StoredEntry {
                added_by: entry.added_by.clone(),
                added_at: entry.added_at,
            },
        )
    });
    Ok(entry)
}

/// Delete by name. Reports whether a row existed; deleting an absent name
/// is not an error at this level (the boundary decides what to surface).
pub fn remove(name: &str) -> bool {
    ENTRIES.with(|entries| entries.borrow_mut().remove(&name.to_string()).is_some())
}

/// All entries, name-ascending.
pub fn list() -> Vec<Entry> {
    ENTRIES.with(|entries| {
        entries
            .borrow()
            .iter()
            .map(|row| {
                let stored = row.value();
                Entry {
                    name: row.key().clone(),
                    added_by: stored.added_by,
                    added_at: stored.added_at,
                }
            })
            .collect()
    })
}

pub fn len() -> u64 {
    ENTRIES.with(|entries| entries.borrow().len())
}
