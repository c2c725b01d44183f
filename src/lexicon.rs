//! Lexical data and the store it is loaded from.
//!
//! A [`LexicalData`] record is what a [`Node`](crate::Node) wraps: an id that is
//! unique per locale, the surface symbol, and an ordered map of grammatical
//! flags. Records live in a [`LexicalStore`]; the linker only ever reads from
//! it during a reduction, and writes happen through [`Node::create`].
//!
//! ## Concurrency
//!
//! Stores are shared between independent sentence reductions, so the trait
//! requires `Send + Sync`. [`MemoryLexicon`] keeps its records behind an
//! `RwLock`: loads and existence probes take the read side and may run
//! concurrently, `save` takes the write side. Each write is a single map
//! insert, so a poisoned lock still holds a consistent map and is recovered
//! with a warning.
//!
//! [`Node::create`]: crate::Node::create

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Insertion-ordered map from flag key to flag value. Keys are unique;
/// re-inserting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
pub struct FlagMap {
    entries: Vec<(String, String)>,
}

impl FlagMap {
    pub fn new() -> Self {
        FlagMap { entries: Vec::new() }
    }

    /// Insert `key` → `value`, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// The first entry in insertion order.
    pub fn first(&self) -> Option<(&str, &str)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn nth(&self, index: usize) -> Option<(&str, &str)> {
        self.entries.get(index).map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<(String, String)>> for FlagMap {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let mut map = FlagMap::new();
        for (k, v) in pairs {
            map.insert(k, v);
        }
        map
    }
}

impl From<FlagMap> for Vec<(String, String)> {
    fn from(map: FlagMap) -> Self {
        map.entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FlagMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// One lexical entry as persisted by a [`LexicalStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalData {
    pub id: String,
    pub locale: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub flags: FlagMap,
}

impl LexicalData {
    pub fn new(id: impl Into<String>, locale: impl Into<String>, symbol: impl Into<String>, flags: FlagMap) -> Self {
        LexicalData { id: id.into(), locale: locale.into(), symbol: symbol.into(), flags }
    }
}

/// Backing store for lexical entries.
///
/// `load` returning `None` is the normal out-of-vocabulary outcome, not a
/// failure.
pub trait LexicalStore: Send + Sync {
    fn load(&self, locale: &str, id: &str) -> Option<LexicalData>;
    fn save(&self, data: &LexicalData) -> Result<()>;
    fn exists(&self, locale: &str, id: &str) -> bool;
}

/// In-memory lexical store keyed by `(locale, id)`.
#[derive(Debug, Default)]
pub struct MemoryLexicon {
    entries: RwLock<HashMap<(String, String), LexicalData>>,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = LexicalData>) -> Self {
        let map = entries.into_iter().map(|d| ((d.locale.clone(), d.id.clone()), d)).collect();
        MemoryLexicon { entries: RwLock::new(map) }
    }

    /// Parse a JSON array of entries:
    ///
    /// ```text
    /// [{"id": "dog", "locale": "en", "symbol": "dog", "flags": [["noun", "Nn"]]}]
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let entries: Vec<LexicalData> = serde_json::from_str(text)?;
        Ok(Self::with_entries(entries))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<(String, String), LexicalData>> {
        self.entries.read().unwrap_or_else(|poisoned| recover(poisoned, "read"))
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<(String, String), LexicalData>> {
        self.entries.write().unwrap_or_else(|poisoned| recover(poisoned, "write"))
    }
}

fn recover<G>(poisoned: PoisonError<G>, op: &str) -> G {
    log::warn!("event=lexicon_lock_poisoned op={}", op);
    poisoned.into_inner()
}

impl LexicalStore for MemoryLexicon {
    fn load(&self, locale: &str, id: &str) -> Option<LexicalData> {
        self.read().get(&(locale.to_string(), id.to_string())).cloned()
    }

    fn save(&self, data: &LexicalData) -> Result<()> {
        self.write().insert((data.locale.clone(), data.id.clone()), data.clone());
        Ok(())
    }

    fn exists(&self, locale: &str, id: &str) -> bool {
        self.read().contains_key(&(locale.to_string(), id.to_string()))
    }
}
