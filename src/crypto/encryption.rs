//! AES-256-GCM authenticated encryption.
//!
//! The nonce is handled by the caller rather than prepended here, because
//! the store format places it between the salt and the ciphertext.
//! The returned ciphertext carries the 16-byte authentication tag at its end.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{Result, ScrtError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Generate a fresh random 12-byte nonce.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| ScrtError::Randomness(format!("nonce: {e}")))?;
    Ok(nonce)
}

/// Encrypt `plaintext` with a 32-byte `key` and a 12-byte `nonce`.
///
/// No additional authenticated data is used.
pub fn encrypt(key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| ScrtError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| ScrtError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Decrypt and authenticate `ciphertext` (ciphertext || tag).
///
/// Any failure, including a bad key, is reported as `DecryptionFailed`
/// so callers cannot tell a wrong password from tampered data.
pub fn decrypt(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(ScrtError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| ScrtError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| ScrtError::DecryptionFailed)
}
