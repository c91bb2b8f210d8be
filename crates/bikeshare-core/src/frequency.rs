//! Frequency counting with deterministic "most common" selection.
//!
//! Every mode in the explorer goes through [`FrequencyTable`]. Ties are
//! broken by the key's `Ord`: the smallest tied key wins, whatever order the
//! values were seen in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A most-common value together with how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeValue<K> {
    pub value: K,
    pub count: usize,
}

/// Occurrence counts keyed by value.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `value`.
    pub fn add(&mut self, value: K) {
        *self.counts.entry(value).or_insert(0) += 1;
    }

    /// The most frequent value; on a tie, the smallest key.
    ///
    /// Returns `None` when nothing was counted.
    pub fn mode(&self) -> Option<ModeValue<K>> {
        let mut best: Option<(&K, usize)> = None;
        // Ascending key order, strict `>`: the first key reaching the top
        // count is kept.
        for (key, &count) in &self.counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((key, count)),
            }
        }
        best.map(|(value, count)| ModeValue {
            value: value.clone(),
            count,
        })
    }

    /// Full distribution ordered by descending count, ties by ascending key.
    pub fn distribution(&self) -> Vec<ModeValue<K>> {
        let mut entries: Vec<ModeValue<K>> = self
            .counts
            .iter()
            .map(|(value, &count)| ModeValue {
                value: value.clone(),
                count,
            })
            .collect();
        // Stable sort over already ascending keys keeps the key tie-break.
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries
    }

    /// Smallest and largest counted value.
    pub fn bounds(&self) -> Option<(K, K)> {
        let (min, _) = self.counts.first_key_value()?;
        let (max, _) = self.counts.last_key_value()?;
        Some((min.clone(), max.clone()))
    }
}

impl<K: Ord + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for value in iter {
            table.add(value);
        }
        table
    }
}
