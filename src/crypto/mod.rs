//! Cryptographic primitives for scrt.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id password-based key derivation (`kdf`)
//! - A zeroizing key holder (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

pub use encryption::{decrypt, encrypt, generate_nonce, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_key, derive_key_with_params, generate_salt, Argon2Params, SALT_LEN};
pub use keys::StoreKey;
