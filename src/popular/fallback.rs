//! Fallback rankings used when job listings cannot be mined.
//!
//! Counts produced here are invented and tagged `Confidence::Synthetic`.

use std::collections::HashSet;

use rand::Rng;

use crate::models::{Confidence, Occupation, PopularSearchItem, SearchCategory};
use crate::popular::keywords::{MAX_KEYWORD_LEN, MIN_KEYWORD_LEN};

/// Range of the random counts given to occupation-derived items.
pub const SYNTHETIC_COUNT_RANGE: std::ops::RangeInclusive<u32> = 50..=350;

const STATIC_KEYWORDS: &[(&str, u32)] = &[
    ("Construction Worker", 245),
    ("Electrician", 189),
    ("Plumber", 167),
    ("Cook", 156),
    ("Driver", 143),
    ("Security Guard", 132),
    ("Cleaner", 98),
    ("Waiter", 87),
];

/// The hard-coded last-resort list, cut to `limit`.
pub fn static_items(limit: usize) -> Vec<PopularSearchItem> {
    STATIC_KEYWORDS
        .iter()
        .take(limit)
        .zip(1u32..)
        .map(|(&(label, count), position)| {
            PopularSearchItem::new(
                position,
                label,
                count,
                SearchCategory::JobTitle,
                Confidence::Synthetic,
            )
        })
        .collect()
}

/// Builds a ranking from occupation names with random counts.
///
/// Looks at up to `2 * limit` occupations, sorts them by their invented
/// count and keeps the top `limit`. Labels are the trimmed occupation names;
/// names outside the keyword length bounds are skipped.
pub fn occupation_items<R: Rng>(
    occupations: &[Occupation],
    limit: usize,
    rng: &mut R,
) -> Vec<PopularSearchItem> {
    let mut seen = HashSet::new();
    let mut items: Vec<PopularSearchItem> = occupations
        .iter()
        .take(limit.saturating_mul(2))
        .filter_map(|occupation| {
            let label = occupation.name.trim();
            let len = label.chars().count();
            if !(MIN_KEYWORD_LEN..=MAX_KEYWORD_LEN).contains(&len) {
                return None;
            }
            seen.insert(label.to_lowercase()).then(|| label.to_string())
        })
        .map(|label| {
            PopularSearchItem::new(
                0,
                label,
                rng.random_range(SYNTHETIC_COUNT_RANGE),
                SearchCategory::Occupation,
                Confidence::Synthetic,
            )
        })
        .collect();

    items.sort_by(|a, b| b.search_count.cmp(&a.search_count));
    items.truncate(limit);
    renumber(&mut items);
    items
}

/// Appends items from `extra` whose label is not already present
/// (case-insensitive) until `items` holds `limit` entries, then renumbers.
pub fn pad_unique<I>(items: &mut Vec<PopularSearchItem>, extra: I, limit: usize)
where
    I: IntoIterator<Item = PopularSearchItem>,
{
    let mut seen: HashSet<String> = items.iter().map(|i| i.label.to_lowercase()).collect();
    for item in extra {
        if items.len() >= limit {
            break;
        }
        if seen.insert(item.label.to_lowercase()) {
            items.push(item);
        }
    }
    renumber(items);
}

/// Reassigns 1-based `id`/`value` in list order.
pub fn renumber(items: &mut [PopularSearchItem]) {
    for (item, position) in items.iter_mut().zip(1u32..) {
        item.renumber(position);
    }
}
