//! Duplicate removal and duplicate counting for filename lists.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// A value that occurs more than once, with its total occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateEntry {
    /// The repeated value
    pub value: String,

    /// How many times it occurs
    pub count: usize,
}

impl fmt::Display for DuplicateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.value, self.count)
    }
}

/// Removes repeated entries and returns `(unique, removed_count)`.
///
/// With `keep_order` the first occurrence of each value is kept in input
/// order; otherwise the distinct values are returned sorted.
#[must_use]
pub fn deduplicate(items: &[String], keep_order: bool) -> (Vec<String>, usize) {
    let unique: Vec<String> = if keep_order {
        let mut seen = HashSet::with_capacity(items.len());
        items
            .iter()
            .filter(|item| seen.insert(item.as_str()))
            .cloned()
            .collect()
    } else {
        items
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    };

    let removed = items.len() - unique.len();
    (unique, removed)
}

/// Counts occurrences and reports every value seen more than once,
/// sorted by value.
#[must_use]
pub fn duplicate_report(items: &[String]) -> Vec<DuplicateEntry> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(value, count)| DuplicateEntry {
            value: value.to_string(),
            count,
        })
        .collect()
}
