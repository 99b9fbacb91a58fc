//! Error types for VaultNote core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Cryptographic failures are always surfaced to the caller; the version
//! store absorbs persistence failures and never returns them from its
//! query/commit operations. The CLI layer maps these to user-friendly
//! messages.

use thiserror::Error;

/// Result type alias for VaultNote operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for VaultNote operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A session key was requested with an empty passphrase
    #[error("Passphrase cannot be empty")]
    EmptyPassphrase,

    /// An encrypt/decrypt call was made without a passphrase
    #[error("Passphrase is required")]
    MissingPassphrase,

    /// Every decryption strategy was exhausted.
    ///
    /// There is no authentication tag in the envelope format, so a wrong
    /// passphrase and corrupted data are indistinguishable.
    #[error("Incorrect passphrase or corrupted data")]
    DecryptionFailed,

    /// The underlying cipher failed while encrypting
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Lower-level cryptographic primitive error
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl VaultError {
    /// Whether this error means the passphrase should be re-prompted.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            VaultError::DecryptionFailed
                | VaultError::MissingPassphrase
                | VaultError::EmptyPassphrase
        )
    }
}
