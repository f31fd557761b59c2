//! Zeroize-on-drop holder for a derived store key.

use zeroize::Zeroize;

use super::kdf::{derive_key_with_params, Argon2Params, KEY_LEN};
use crate::errors::Result;

/// A wrapper around a 32-byte store key that automatically zeroes
/// its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct StoreKey {
    bytes: [u8; KEY_LEN],
}

impl StoreKey {
    /// Create a new `StoreKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Derive the key for `password` and `salt` with Argon2id.
    ///
    /// The intermediate buffer is wiped before returning.
    pub fn derive(password: &[u8], salt: &[u8], params: &Argon2Params) -> Result<Self> {
        let mut raw = derive_key_with_params(password, salt, params)?;
        let key = Self::new(raw);
        raw.zeroize();
        Ok(key)
    }

    /// Access the raw key bytes (e.g. to build the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}
