//! In-memory secret store and its encrypted blob format.
//!
//! - `Store`: the key -> binary value mapping a command works on
//! - `format`: turning a `Store` into a password-protected blob and back

pub mod format;

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;
use zeroize::Zeroize;

use crate::errors::{Result, ScrtError};

pub use format::{read_store, read_store_with_params, write_store, write_store_with_params};

/// The decrypted contents of one store.
///
/// Keys are kept in a `BTreeMap` so `list` and `iter` are sorted and the
/// serialized plaintext is canonical.  Values are wiped when the store is
/// dropped.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Store {
    data: BTreeMap<String, Vec<u8>>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        debug!("creating new store");
        Self::default()
    }

    pub(crate) fn from_map(data: BTreeMap<String, Vec<u8>>) -> Self {
        Self { data }
    }

    /// Returns `true` if a value is bound to `key`.
    pub fn has(&self, key: &str) -> bool {
        debug!(key, "checking key existence");
        self.data.contains_key(key)
    }

    /// All keys currently in the store, sorted.
    pub fn list(&self) -> Vec<String> {
        debug!("listing keys");
        self.data.keys().cloned().collect()
    }

    /// The value bound to `key`.
    pub fn get(&self, key: &str) -> Result<&[u8]> {
        debug!(key, "retrieving value for key");
        self.data
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| ScrtError::KeyNotFound(key.to_string()))
    }

    /// Bind `value` to `key`, replacing any previous value.
    ///
    /// `None` means no value was supplied at all and is rejected;
    /// `Some(vec![])` stores a legitimate empty value.
    pub fn set(&mut self, key: &str, value: Option<Vec<u8>>) -> Result<()> {
        debug!(key, "setting value for key");
        let value = value.ok_or(ScrtError::InvalidValue)?;
        if let Some(mut previous) = self.data.insert(key.to_string(), value) {
            previous.zeroize();
        }
        Ok(())
    }

    /// Remove any value bound to `key`.  Unknown keys are ignored.
    pub fn unset(&mut self, key: &str) {
        debug!(key, "unsetting value for key");
        if let Some(mut previous) = self.data.remove(key) {
            previous.zeroize();
        }
    }

    /// Number of keys in the store.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

// Never print values, only keys.
impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("keys", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        for value in self.data.values_mut() {
            value.zeroize();
        }
    }
}
