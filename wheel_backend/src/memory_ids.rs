// Central registry of stable memory ids.
//
// Never reuse or renumber an id that has shipped: stable memories are
// addressed by these numbers across upgrades.

pub const ENTRIES_MEMORY_ID: u8 = 0;
pub const RESULTS_MEMORY_ID: u8 = 1;
