//! The keyed record map threaded through the graph.
//!
//! Records are opaque to the core: the executor only ever looks at keys,
//! never at the values behind them.

use std::collections::HashMap;

/// A mapping from string key to an opaque record value.
///
/// Keys are unique; insertion order carries no meaning. The executor moves
/// records in and out of a `RecordSet` as units consume and produce them.
#[derive(Debug, Clone)]
pub struct RecordSet<R> {
    records: HashMap<String, R>,
}

impl<R> RecordSet<R> {
    pub fn new() -> Self {
        Self { records: HashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts a record, returning the previous record under that key, if any.
    pub fn insert(&mut self, key: impl Into<String>, record: R) -> Option<R> {
        self.records.insert(key.into(), record)
    }

    /// Removes and returns the record under `key`.
    pub fn remove(&mut self, key: &str) -> Option<R> {
        self.records.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&R> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Returns the key set sorted, for deterministic diagnostics.
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.records.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// True when the key set equals `expected` as a set (duplicates in
    /// `expected` collapse, order ignored).
    pub fn key_set_matches(&self, expected: &[String]) -> bool {
        let distinct: std::collections::HashSet<&str> =
            expected.iter().map(String::as_str).collect();
        distinct.len() == self.records.len()
            && distinct.iter().all(|k| self.records.contains_key(*k))
    }
}

impl<R> Default for RecordSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> From<HashMap<String, R>> for RecordSet<R> {
    fn from(records: HashMap<String, R>) -> Self {
        Self { records }
    }
}

impl<R> FromIterator<(String, R)> for RecordSet<R> {
    fn from_iter<I: IntoIterator<Item = (String, R)>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

impl<R> IntoIterator for RecordSet<R> {
    type Item = (String, R);
    type IntoIter = std::collections::hash_map::IntoIter<String, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
