//! Content store: bundled fallback documents keyed by section target id.
//!
//! The store is only consulted after a live fetch has failed. Entries are
//! immutable once the store is built.

use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

const BUNDLED: &[(&str, &str)] = &[
    ("prompt-content", include_str!("../content/prompt.md")),
    ("tasks-content", include_str!("../content/tasks.md")),
    ("walkthrough-content", include_str!("../content/walkthrough.md")),
    ("versions-content", include_str!("../content/versions.md")),
    ("defis-content", include_str!("../content/challenges.md")),
];

/// Mapping from section target id to raw markdown text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentStore {
    entries: HashMap<String, String>,
}

impl ContentStore {
    /// An empty store; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The store compiled into the binary.
    pub fn bundled() -> Self {
        BUNDLED.iter().map(|(id, text)| (*id, *text)).collect()
    }

    /// Load a store from a JSON object of `{ "target-id": "markdown" }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("invalid content store: {}", e)))?;
        Ok(Self { entries })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn get(&self, target_id: &str) -> Option<&str> {
        self.entries.get(target_id).map(String::as_str)
    }

    pub fn contains(&self, target_id: &str) -> bool {
        self.entries.contains_key(target_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `other` on top of this store. Later entries win.
    pub fn extend(&mut self, other: ContentStore) {
        self.entries.extend(other.entries);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContentStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
