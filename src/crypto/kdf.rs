//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The store blob does not record the parameters, so
//! every blob ever written by scrt uses `Argon2Params::default()`; the
//! explicit variants exist for tests and tooling.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{Result, ScrtError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MiB).
    pub memory_kib: u32,
    /// Number of iterations (default: 1).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 1,
            parallelism: 4,
        }
    }
}

/// Derive a 32-byte key from a password and salt with the default params.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    derive_key_with_params(password, salt, &Argon2Params::default())
}

/// Derive a 32-byte key with explicit Argon2id parameters.
///
/// The same password + salt + params will always produce the same key.
/// Enforces minimum Argon2 parameters to prevent dangerously weak KDF settings.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &[u8],
    argon2_params: &Argon2Params,
) -> Result<[u8; KEY_LEN]> {
    if argon2_params.memory_kib < MIN_MEMORY_KIB {
        return Err(ScrtError::KeyDerivationFailed(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            argon2_params.memory_kib
        )));
    }
    if argon2_params.iterations < 1 {
        return Err(ScrtError::KeyDerivationFailed(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if argon2_params.parallelism < 1 {
        return Err(ScrtError::KeyDerivationFailed(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| ScrtError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| ScrtError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| ScrtError::Randomness(format!("salt: {e}")))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Argon2Params = Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn default_params_match_store_format() {
        let p = Argon2Params::default();
        assert_eq!(p.memory_kib, 65_536);
        assert_eq!(p.iterations, 1);
        assert_eq!(p.parallelism, 4);
    }

    #[test]
    fn rejects_weak_memory_cost() {
        let weak = Argon2Params {
            memory_kib: 1_024,
            ..FAST
        };
        let err = derive_key_with_params(b"pw", &[0u8; SALT_LEN], &weak).unwrap_err();
        assert!(matches!(err, ScrtError::KeyDerivationFailed(_)));
    }

    #[test]
    fn rejects_zero_iterations_and_lanes() {
        let no_iter = Argon2Params {
            iterations: 0,
            ..FAST
        };
        assert!(derive_key_with_params(b"pw", &[0u8; SALT_LEN], &no_iter).is_err());

        let no_lanes = Argon2Params {
            parallelism: 0,
            ..FAST
        };
        assert!(derive_key_with_params(b"pw", &[0u8; SALT_LEN], &no_lanes).is_err());
    }

    #[test]
    fn empty_password_is_accepted() {
        let key = derive_key_with_params(b"", &[7u8; SALT_LEN], &FAST).unwrap();
        assert_eq!(key.len(), KEY_LEN);
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
