// Selection statistics derived from a ledger snapshot.
//
// Pure function of its input: no storage, no clock. Ties sort by name so
// the output is reproducible for tests and stable for UI rendering.

use std::collections::BTreeMap;

use crate::types::{NameStats, SpinResult};

/// Group results by selected name with counts and percentages,
/// count-descending, ties name-ascending.
pub fn aggregate(results: &[SpinResult]) -> Vec<NameStats> {
    if results.is_empty() {
        return Vec::new();
    }

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for result in results {
        *counts.entry(result.selected_name.as_str()).or_insert(0) += 1;
    }

    let total = results.len() as f64;
    let mut stats: Vec<NameStats> = counts
        .into_iter()
        .map(|(name, count)| NameStats {
            name: name.to_string(),
            count,
            percentage: count as f64 / total * 100.0,
        })
        .collect();

    // BTreeMap already yielded name-ascending; a stable sort on count keeps
    // that order within ties.
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}
