use std::collections::{BTreeMap, HashMap};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Token to occurrence-count mapping that remembers first-occurrence order.
///
/// Used both for one chunk's partial table and for a run's aggregate table.
/// Equality compares counts only; two tables built from differently sized
/// chunks of the same tokens are equal.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a table from worker wire pairs. Repeated tokens are summed.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, u64)>) -> Self {
        let mut table = Self::new();
        for (token, count) in pairs {
            table.add(token, count);
        }
        table
    }

    /// Adds `count` to `token`; an absent token starts at zero.
    pub fn add(&mut self, token: String, count: u64) {
        match self.index.get(&token) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(token.clone(), self.entries.len());
                self.entries.push((token, count));
            }
        }
    }

    /// Folds a partial table into this one.
    pub fn merge(&mut self, partial: FrequencyTable) {
        for (token, count) in partial.entries {
            self.add(token, count);
        }
    }

    pub fn get(&self, token: &str) -> Option<u64> {
        self.index.get(token).map(|&slot| self.entries[slot].1)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts; equals the number of tokens counted.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(token, count)| (token.as_str(), *count))
    }

    /// Wire form sent back by a worker.
    pub fn into_pairs(self) -> Vec<(String, u64)> {
        self.entries
    }

    pub fn to_sorted_map(&self) -> BTreeMap<String, u64> {
        self.entries.iter().cloned().collect()
    }
}

impl PartialEq for FrequencyTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(token, count)| other.get(token) == Some(*count))
    }
}

impl Eq for FrequencyTable {}

/// Serializes as a JSON object in first-occurrence order.
impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (token, count) in &self.entries {
            map.serialize_entry(token, count)?;
        }
        map.end()
    }
}

/// Counts one chunk in isolation.
///
/// Pure and free of shared state, so it can run on any worker thread.
pub fn count_chunk(chunk: &[String]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for token in chunk {
        table.add(token.clone(), 1);
    }
    table
}
