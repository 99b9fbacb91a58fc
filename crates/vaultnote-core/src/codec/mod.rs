//! Envelope codec: plaintext note bodies to persisted ciphertext and back.
//!
//! The codec is a pure transform. It holds no state and touches nothing but
//! the OS random source (for salts).
//!
//! ## Formats
//!
//! `encrypt` always writes the salted shape:
//!
//! ```text
//! {"salt":"<32 hex chars>","data":"<base64 OpenSSL Salted__ container>"}
//! ```
//!
//! where the container is keyed by the hex string of
//! `PBKDF2-HMAC-SHA256(passphrase, salt, 1000 iterations, 32 bytes)`.
//!
//! `decrypt` additionally reads every shape earlier releases wrote; see
//! [`strategy::STRATEGIES`] for the order.
//!
//! ## Known weakness
//!
//! No envelope carries an authentication tag. "Wrong passphrase" and
//! "corrupted data" both surface as [`VaultError::DecryptionFailed`], and a
//! wrong key can in rare cases yield a padding-valid, UTF-8-valid result.
//! Fixing that needs a new wire format.

pub mod envelope;
pub mod strategy;

use zeroize::Zeroizing;

use crate::crypto::{derive_key, openssl_encrypt, random_bytes, SALT_LENGTH};
use crate::error::{Result, VaultError};

pub use envelope::{inspect_envelope, Envelope, EnvelopeInfo, SaltedEnvelope};
pub use strategy::{EnvelopeFormat, Strategy, STRATEGIES};

/// Plaintext recovered by [`decrypt`], tagged with how it was recovered.
#[derive(Clone)]
pub struct Decrypted {
    plaintext: Zeroizing<String>,
    format: EnvelopeFormat,
}

impl Decrypted {
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    pub fn into_plaintext(self) -> Zeroizing<String> {
        self.plaintext
    }

    pub fn format(&self) -> EnvelopeFormat {
        self.format
    }

    /// `false` when the text came from the Base64 heuristic, which proves
    /// nothing about the passphrase.
    pub fn is_verified(&self) -> bool {
        self.format.is_verified()
    }
}

impl std::fmt::Debug for Decrypted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decrypted")
            .field("plaintext", &"[REDACTED]")
            .field("format", &self.format)
            .finish()
    }
}

/// Encrypt a note body into a salted envelope.
///
/// An empty `plaintext` yields the empty-string sentinel rather than an
/// envelope. Each call draws a fresh 128-bit salt, so encrypting the same
/// text twice gives different envelopes.
///
/// # Errors
///
/// - [`VaultError::MissingPassphrase`] if `passphrase` is empty
/// - [`VaultError::EncryptionFailed`] if randomness or the cipher fails
///
/// # Examples
///
/// ```
/// use vaultnote_core::codec::{decrypt, encrypt};
///
/// let envelope = encrypt("Hello", "correct horse").unwrap();
/// let decrypted = decrypt(&envelope, "correct horse").unwrap();
/// assert_eq!(decrypted.plaintext(), "Hello");
/// ```
pub fn encrypt(plaintext: &str, passphrase: &str) -> Result<String> {
    if plaintext.is_empty() {
        return Ok(String::new());
    }
    if passphrase.is_empty() {
        return Err(VaultError::MissingPassphrase);
    }

    let salt: [u8; SALT_LENGTH] =
        random_bytes().map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;
    let key = derive_key(passphrase, &salt)?;
    let data = openssl_encrypt(plaintext.as_bytes(), key.to_hex().as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    let envelope = SaltedEnvelope {
        salt: hex::encode(salt),
        data,
    };
    envelope
        .to_wire()
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))
}

/// Decrypt an envelope of any known shape.
///
/// An empty envelope decrypts to the empty string. Otherwise the strategies
/// run in registry order, each isolated from the others, and the first
/// non-empty UTF-8 result wins.
///
/// # Errors
///
/// - [`VaultError::MissingPassphrase`] if `passphrase` is empty
/// - [`VaultError::DecryptionFailed`] if every strategy was exhausted
pub fn decrypt(envelope: &str, passphrase: &str) -> Result<Decrypted> {
    if envelope.is_empty() {
        return Ok(Decrypted {
            plaintext: Zeroizing::new(String::new()),
            format: EnvelopeFormat::Empty,
        });
    }
    if passphrase.is_empty() {
        return Err(VaultError::MissingPassphrase);
    }

    for strategy in STRATEGIES {
        if let Some(plaintext) = (strategy.attempt)(envelope, passphrase) {
            if strategy.format.is_verified() {
                tracing::debug!(strategy = strategy.name, "Envelope decrypted");
            } else {
                tracing::warn!(
                    strategy = strategy.name,
                    "Envelope recovered by heuristic; passphrase not verified"
                );
            }
            return Ok(Decrypted {
                plaintext,
                format: strategy.format,
            });
        }
        tracing::trace!(strategy = strategy.name, "Strategy did not apply");
    }

    tracing::debug!(length = envelope.len(), "All decryption strategies failed");
    Err(VaultError::DecryptionFailed)
}

/// Whether `passphrase` opens `envelope`, without surfacing an error.
///
/// An empty envelope or passphrase is never "correct".
pub fn is_correct_passphrase(envelope: &str, passphrase: &str) -> bool {
    if envelope.is_empty() || passphrase.is_empty() {
        return false;
    }
    match decrypt(envelope, passphrase) {
        Ok(decrypted) => !decrypted.plaintext().is_empty(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "Meeting notes: ship the codec before the history store lands.";

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let envelope = encrypt(NOTE, "test-passphrase-secure-123").unwrap();
        let decrypted = decrypt(&envelope, "test-passphrase-secure-123").unwrap();

        assert_eq!(decrypted.plaintext(), NOTE);
        assert_eq!(decrypted.format(), EnvelopeFormat::Salted);
        assert!(decrypted.is_verified());
    }

    #[test]
    fn test_envelope_is_salted_json() {
        let envelope = encrypt(NOTE, "pw").unwrap();
        let salted = SaltedEnvelope::parse(&envelope).unwrap();

        assert_eq!(salted.salt.len(), SALT_LENGTH * 2);
        assert!(salted.data.starts_with("U2FsdGVkX1"));
        assert!(!envelope.contains(NOTE));
    }

    #[test]
    fn test_fresh_salt_per_call() {
        let a = encrypt(NOTE, "pw").unwrap();
        let b = encrypt(NOTE, "pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_plaintext_sentinel() {
        assert_eq!(encrypt("", "pw").unwrap(), "");
        // empty input wins over a missing passphrase
        assert_eq!(encrypt("", "").unwrap(), "");
    }

    #[test]
    fn test_empty_envelope_decrypts_to_empty() {
        let decrypted = decrypt("", "pw").unwrap();
        assert_eq!(decrypted.plaintext(), "");
        assert_eq!(decrypted.format(), EnvelopeFormat::Empty);
    }

    #[test]
    fn test_missing_passphrase() {
        assert!(matches!(encrypt(NOTE, ""), Err(VaultError::MissingPassphrase)));
        assert!(matches!(
            decrypt("U2FsdGVkX1abc", ""),
            Err(VaultError::MissingPassphrase)
        ));
    }

    #[test]
    fn test_wrong_passphrase_fails() {
        let envelope = encrypt(NOTE, "correct-passphrase-123").unwrap();
        let result = decrypt(&envelope, "wrong-passphrase-456");
        assert!(matches!(result, Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn test_garbage_fails() {
        let result = decrypt("definitely not an envelope!", "pw");
        assert!(matches!(result, Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn test_is_correct_passphrase() {
        let envelope = encrypt(NOTE, "right").unwrap();
        assert!(is_correct_passphrase(&envelope, "right"));
        assert!(!is_correct_passphrase(&envelope, "wrong"));
        assert!(!is_correct_passphrase("", "right"));
        assert!(!is_correct_passphrase(&envelope, ""));
    }

    #[test]
    fn test_unicode_round_trip() {
        let text = "Grüße aus Köln 🌧️\nzweite Zeile";
        let envelope = encrypt(text, "pässwörd").unwrap();
        assert_eq!(decrypt(&envelope, "pässwörd").unwrap().plaintext(), text);
    }
}
