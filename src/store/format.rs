//! Encrypted store blob format.
//!
//! A store blob has this layout:
//!
//! ```text
//! [salt: 16 bytes][nonce: 12 bytes][AES-256-GCM ciphertext + 16-byte tag]
//! ```
//!
//! - **Salt**: random per write, feeds Argon2id together with the password.
//! - **Nonce**: random per write, never reused with a given key.
//! - **Ciphertext**: the JSON object `{"key": "<base64 value>", ...}`,
//!   keys sorted, sealed with no additional authenticated data.
//!
//! The blob carries no magic bytes or version: anything that is not
//! authenticated by the tag is rejected as a decryption failure.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::info;
use zeroize::Zeroizing;

use super::Store;
use crate::crypto::{self, Argon2Params, StoreKey, NONCE_LEN, SALT_LEN};
use crate::errors::{Result, ScrtError};

/// Fixed-size prefix: salt + nonce.
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Encrypt `store` under `password` into a self-contained blob.
///
/// Two calls with the same inputs produce different blobs.
pub fn write_store(password: &[u8], store: &Store) -> Result<Vec<u8>> {
    write_store_with_params(password, store, &Argon2Params::default())
}

/// Like `write_store`, with explicit Argon2id parameters.
pub fn write_store_with_params(
    password: &[u8],
    store: &Store,
    params: &Argon2Params,
) -> Result<Vec<u8>> {
    info!("serializing store data");
    let plaintext = serialize(store)?;

    info!("generating random salt");
    let salt = crypto::generate_salt()?;

    info!("deriving key from password");
    let key = StoreKey::derive(password, &salt, params)?;

    info!("generating random nonce");
    let nonce = crypto::generate_nonce()?;

    info!("encrypting serialized store data");
    let ciphertext = crypto::encrypt(key.as_bytes(), &nonce, &plaintext)?;

    let mut blob = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt and verify a blob produced by `write_store`.
pub fn read_store(password: &[u8], blob: &[u8]) -> Result<Store> {
    read_store_with_params(password, blob, &Argon2Params::default())
}

/// Like `read_store`, with explicit Argon2id parameters.
///
/// The parameters must be the ones the blob was written with, otherwise
/// the derived key differs and decryption fails.
pub fn read_store_with_params(
    password: &[u8],
    blob: &[u8],
    params: &Argon2Params,
) -> Result<Store> {
    if blob.len() < HEADER_LEN {
        return Err(ScrtError::MalformedBlob {
            expected: HEADER_LEN,
            actual: blob.len(),
        });
    }

    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    info!("deriving key from password");
    let key = StoreKey::derive(password, salt, params)?;

    info!("decrypting store data");
    let plaintext = Zeroizing::new(crypto::decrypt(key.as_bytes(), nonce, ciphertext)?);

    info!("deserializing decrypted data");
    deserialize(&plaintext)
}

// ---------------------------------------------------------------------------
// Plaintext encoding
// ---------------------------------------------------------------------------

fn serialize(store: &Store) -> Result<Zeroizing<Vec<u8>>> {
    let encoded: BTreeMap<&str, Zeroizing<String>> = store
        .iter()
        .map(|(key, value)| (key, Zeroizing::new(BASE64.encode(value))))
        .collect();

    let view: BTreeMap<&str, &str> = encoded.iter().map(|(k, v)| (*k, v.as_str())).collect();

    serde_json::to_vec(&view)
        .map(Zeroizing::new)
        .map_err(|e| ScrtError::InvalidStore(format!("cannot serialize store data: {e}")))
}

fn deserialize(plaintext: &[u8]) -> Result<Store> {
    let encoded: BTreeMap<String, String> = serde_json::from_slice(plaintext)
        .map_err(|e| ScrtError::CorruptData(format!("invalid JSON: {e}")))?;

    let mut data = BTreeMap::new();
    for (key, value) in encoded {
        let value = Zeroizing::new(value);
        let bytes = BASE64
            .decode(value.as_bytes())
            .map_err(|e| ScrtError::CorruptData(format!("invalid value for \"{key}\": {e}")))?;
        data.insert(key, bytes);
    }

    Ok(Store::from_map(data))
}
