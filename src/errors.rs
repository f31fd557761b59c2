use thiserror::Error;

/// All errors that can occur in scrt.
#[derive(Debug, Error)]
pub enum ScrtError {
    // --- Crypto errors ---
    #[error("Failed to obtain random bytes: {0}")]
    Randomness(String),

    #[error("Invalid store data: expected at least {expected} bytes, got {actual}")]
    MalformedBlob { expected: usize, actual: usize },

    #[error("Decryption failed: wrong password or corrupted store")]
    DecryptionFailed,

    #[error("Store data is corrupted: {0}")]
    CorruptData(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Store errors ---
    #[error("No value for \"{0}\"")]
    KeyNotFound(String),

    #[error("Cannot set value: no value supplied")]
    InvalidValue,

    #[error("Invalid store: {0}")]
    InvalidStore(String),

    #[error("Value exists for key \"{0}\", use --overwrite to force")]
    KeyAlreadyExists(String),

    // --- Storage errors ---
    #[error("No store found at {0}, run `scrt init` first")]
    StoreNotFound(String),

    #[error("Store already exists, use --overwrite to force init")]
    StoreAlreadyExists,

    #[error("Unknown storage type: {0}")]
    UnknownStorage(String),

    #[error("Missing {0}")]
    MissingOption(String),

    #[error("Storage error: {0}")]
    Backend(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for scrt results.
pub type Result<T> = std::result::Result<T, ScrtError>;
