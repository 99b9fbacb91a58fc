//! Key derivation for note envelopes.
//!
//! Two derivations are in play:
//! - PBKDF2-HMAC-SHA256 over a random 16-byte salt, used by the salted
//!   envelope format that `encrypt` writes today.
//! - OpenSSL's `EVP_BytesToKey` with MD5 and a single round, used when a
//!   passphrase string is handed straight to the cipher (legacy envelopes).

use md5::{Digest, Md5};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Result, VaultError};

/// PBKDF2 iteration count.
///
/// Low by current standards; kept because every salted envelope on disk was
/// written with it.
pub const PBKDF2_ITERATIONS: u32 = 1000;

/// Random salt length in bytes (128 bits).
pub const SALT_LENGTH: usize = 16;

/// Length of derived key in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

/// AES block / CBC IV length in bytes.
pub const IV_LENGTH: usize = 16;

/// A key derived from a passphrase and salt.
///
/// Key material is zeroized when dropped.
#[derive(Clone)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// Avoid storing or logging this value.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Lowercase hex rendering of the key.
    ///
    /// Salted envelopes feed this string, not the raw bytes, to the
    /// OpenSSL-style cipher layer.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.key))
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 256-bit key from a passphrase using PBKDF2-HMAC-SHA256.
///
/// # Arguments
///
/// * `passphrase` - The passphrase to derive from
/// * `salt` - Salt bytes stored alongside the envelope
///
/// # Examples
///
/// ```
/// use vaultnote_core::crypto::derive_key;
///
/// let salt = [7u8; 16];
/// let key = derive_key("my-passphrase", &salt).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<DerivedKey> {
    if passphrase.is_empty() {
        return Err(VaultError::MissingPassphrase);
    }
    if salt.is_empty() {
        return Err(VaultError::InvalidInput("Salt cannot be empty".to_string()));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key_bytes);
    let key = DerivedKey::from_bytes(key_bytes);
    key_bytes.zeroize();
    Ok(key)
}

/// Key and IV produced by [`openssl_key_iv`].
pub struct KeyIv {
    pub key: [u8; KEY_LENGTH],
    pub iv: [u8; IV_LENGTH],
}

impl Drop for KeyIv {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
    }
}

/// OpenSSL `EVP_BytesToKey` with MD5, one round, AES-256 key + IV sizes.
///
/// `D_i = MD5(D_{i-1} || password || salt)`, concatenated until 48 bytes
/// are available. A missing salt matches `openssl enc -nosalt`.
pub fn openssl_key_iv(password: &[u8], salt: Option<&[u8]>) -> KeyIv {
    let mut material = Zeroizing::new(Vec::with_capacity(KEY_LENGTH + IV_LENGTH + 16));
    let mut previous: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::new());

    while material.len() < KEY_LENGTH + IV_LENGTH {
        let mut hasher = Md5::new();
        hasher.update(previous.as_slice());
        hasher.update(password);
        if let Some(salt) = salt {
            hasher.update(salt);
        }
        let digest = hasher.finalize();
        previous.clear();
        previous.extend_from_slice(&digest);
        material.extend_from_slice(&digest);
    }

    let mut key = [0u8; KEY_LENGTH];
    let mut iv = [0u8; IV_LENGTH];
    key.copy_from_slice(&material[..KEY_LENGTH]);
    iv.copy_from_slice(&material[KEY_LENGTH..KEY_LENGTH + IV_LENGTH]);
    KeyIv { key, iv }
}

/// Fill a fixed-size buffer from the OS random source.
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| VaultError::Crypto(format!("Failed to gather randomness: {}", e)))?;
    Ok(bytes)
}
