// src/crawl/ranking.rs
// =============================================================================
// Orders word counts from most to least popular.
//
// Ordering, applied as successive tie-breaks:
// 1. higher count first
// 2. longer word first (length in characters)
// 3. alphabetically smaller word first
//
// No two distinct words compare equal, so the output never depends on the
// iteration order of the input map.
// =============================================================================

use std::cmp::Ordering;

/// Sorts `counts` by popularity and keeps at most `limit` entries.
pub fn rank<I>(counts: I, limit: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();

    // Only the top `limit` need a full sort
    if limit < entries.len() {
        if limit == 0 {
            return Vec::new();
        }
        entries.select_nth_unstable_by(limit - 1, compare);
        entries.truncate(limit);
    }

    entries.sort_unstable_by(compare);
    entries
}

fn compare(a: &(String, u64), b: &(String, u64)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| b.0.chars().count().cmp(&a.0.chars().count()))
        .then_with(|| a.0.cmp(&b.0))
}
