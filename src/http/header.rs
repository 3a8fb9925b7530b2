//! Thread-safe, case-insensitive multi-value header store.
//!
//! # Design Decisions
//! - Keys are canonicalized (`content-type` → `Content-Type`) on every operation
//! - Keys with bytes outside the header token set are kept verbatim
//! - Reads take the shared lock, writes the exclusive lock
//! - Snapshots are deep copies; mutating them never touches the store

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Canonical form of a header key.
///
/// The first letter and any letter following a hyphen are upper-cased, the
/// rest lower-cased. Keys containing a byte that is not a valid header token
/// character are returned unchanged; the empty key stays empty.
pub fn canonical_key(key: &str) -> String {
    if !key.bytes().all(is_token_byte) {
        return key.to_string();
    }

    let mut upper = true;
    key.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Header mapping shared between a request or response and its middlewares.
#[derive(Debug, Default)]
pub struct HeaderStore {
    inner: RwLock<HashMap<String, Vec<String>>>,
}

impl HeaderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<String>>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<String>>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `value` to the values of `key`.
    pub fn add(&self, key: &str, value: impl Into<String>) {
        self.write()
            .entry(canonical_key(key))
            .or_default()
            .push(value.into());
    }

    /// Replace every value of `key` with `value`.
    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.write().insert(canonical_key(key), vec![value.into()]);
    }

    /// Remove `key` and all its values.
    pub fn delete(&self, key: &str) {
        self.write().remove(&canonical_key(key));
    }

    /// First value of `key`.
    ///
    /// Returns `None` when the key is absent or its first value is empty.
    pub fn get(&self, key: &str) -> Option<String> {
        self.read()
            .get(&canonical_key(key))
            .and_then(|values| values.first())
            .filter(|value| !value.is_empty())
            .cloned()
    }

    /// All values of `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.read()
            .get(&canonical_key(key))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns true if `key` has at least one value.
    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(&canonical_key(key))
    }

    /// Deep copy of the whole mapping.
    pub fn values(&self) -> HashMap<String, Vec<String>> {
        self.read().clone()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl Clone for HeaderStore {
    fn clone(&self) -> Self {
        Self {
            inner: RwLock::new(self.values()),
        }
    }
}

impl From<HashMap<String, Vec<String>>> for HeaderStore {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        map.into_iter()
            .flat_map(|(key, values)| values.into_iter().map(move |v| (key.clone(), v)))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let store = HeaderStore::new();
        for (key, value) in iter {
            store.add(key.as_ref(), value);
        }
        store
    }
}
