//! Ordered registry of decryption strategies.
//!
//! Each strategy is a pure `(envelope, passphrase) -> Option<plaintext>`
//! function. `decrypt` walks [`STRATEGIES`] in order and stops at the first
//! `Some`. New formats are appended at the end; existing entries are never
//! edited, because notes written by every earlier release must keep
//! decrypting with the same passphrase.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Serialize;
use zeroize::Zeroizing;

use super::envelope::{is_base64_alphabet, SaltedEnvelope};
use crate::crypto::cipher::has_openssl_header;
use crate::crypto::{
    aes_ecb_decrypt, derive_key, openssl_decrypt, openssl_decrypt_unsalted,
};

/// Which envelope format a plaintext was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeFormat {
    /// Empty-string sentinel
    Empty,
    /// `{salt, data}` with a hex salt decoded to bytes for PBKDF2
    Salted,
    /// `{salt, data}` whose salt text was fed to PBKDF2 as-is
    SaltedTextSalt,
    /// OpenSSL `Salted__` container keyed directly by the passphrase
    OpenSsl,
    /// Headerless CBC body keyed by an unsalted `EVP_BytesToKey` run
    OpenSslUnsalted,
    /// ECB body keyed by the raw UTF-8 passphrase bytes
    RawKeyEcb,
    /// Plain Base64 text; no cryptographic check was made
    Base64Plain,
}

impl EnvelopeFormat {
    /// `false` only for the Base64 heuristic.
    pub fn is_verified(&self) -> bool {
        !matches!(self, EnvelopeFormat::Base64Plain)
    }
}

/// A named decryption attempt.
pub struct Strategy {
    pub name: &'static str,
    pub format: EnvelopeFormat,
    pub attempt: fn(&str, &str) -> Option<Zeroizing<String>>,
}

/// Decryption strategies, newest format first.
pub static STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "salted-pbkdf2",
        format: EnvelopeFormat::Salted,
        attempt: salted_pbkdf2,
    },
    Strategy {
        name: "salted-pbkdf2-text-salt",
        format: EnvelopeFormat::SaltedTextSalt,
        attempt: salted_pbkdf2_text_salt,
    },
    Strategy {
        name: "openssl-passphrase",
        format: EnvelopeFormat::OpenSsl,
        attempt: openssl_passphrase,
    },
    Strategy {
        name: "openssl-cbc-nosalt",
        format: EnvelopeFormat::OpenSslUnsalted,
        attempt: openssl_cbc_nosalt,
    },
    Strategy {
        name: "raw-key-ecb",
        format: EnvelopeFormat::RawKeyEcb,
        attempt: raw_key_ecb,
    },
    Strategy {
        name: "base64-plaintext",
        format: EnvelopeFormat::Base64Plain,
        attempt: base64_plaintext,
    },
];

/// Lenient about trailing `=` like a browser `atob`.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn salted_pbkdf2(envelope: &str, passphrase: &str) -> Option<Zeroizing<String>> {
    let salted = SaltedEnvelope::parse(envelope)?;
    let salt = hex::decode(&salted.salt).ok()?;
    decrypt_salted(&salted, passphrase, &salt)
}

fn salted_pbkdf2_text_salt(envelope: &str, passphrase: &str) -> Option<Zeroizing<String>> {
    let salted = SaltedEnvelope::parse(envelope)?;
    decrypt_salted(&salted, passphrase, salted.salt.as_bytes())
}

fn decrypt_salted(
    salted: &SaltedEnvelope,
    passphrase: &str,
    salt: &[u8],
) -> Option<Zeroizing<String>> {
    let key = derive_key(passphrase, salt).ok()?;
    let bytes = openssl_decrypt(&salted.data, key.to_hex().as_bytes()).ok()?;
    non_empty_utf8(bytes)
}

fn openssl_passphrase(envelope: &str, passphrase: &str) -> Option<Zeroizing<String>> {
    let bytes = openssl_decrypt(envelope, passphrase.as_bytes()).ok()?;
    non_empty_utf8(bytes)
}

fn openssl_cbc_nosalt(envelope: &str, passphrase: &str) -> Option<Zeroizing<String>> {
    let bytes = openssl_decrypt_unsalted(envelope, passphrase.as_bytes()).ok()?;
    non_empty_utf8(bytes)
}

fn raw_key_ecb(envelope: &str, passphrase: &str) -> Option<Zeroizing<String>> {
    let body = LENIENT_BASE64.decode(envelope.trim().as_bytes()).ok()?;
    let bytes = aes_ecb_decrypt(passphrase.as_bytes(), &body).ok()?;
    non_empty_utf8(Zeroizing::new(bytes))
}

/// Not cryptographic: returns any Base64 payload that decodes to text with
/// at least one printable ASCII character.
///
/// Bytes that are not UTF-8 are read as Latin-1, the only range a browser
/// `btoa` could have encoded. Rejected: anything outside the Base64
/// alphabet, undecodable or empty input, and OpenSSL containers.
fn base64_plaintext(envelope: &str, _passphrase: &str) -> Option<Zeroizing<String>> {
    if !is_base64_alphabet(envelope) {
        return None;
    }
    let decoded = Zeroizing::new(LENIENT_BASE64.decode(envelope.as_bytes()).ok()?);
    if decoded.is_empty() || has_openssl_header(&decoded) {
        return None;
    }
    let text = match std::str::from_utf8(&decoded) {
        Ok(text) => Zeroizing::new(text.to_string()),
        Err(_) => Zeroizing::new(decoded.iter().map(|&b| char::from(b)).collect()),
    };
    if !text.chars().any(|c| matches!(c, ' '..='~')) {
        return None;
    }
    Some(text)
}

fn non_empty_utf8(bytes: Zeroizing<Vec<u8>>) -> Option<Zeroizing<String>> {
    if bytes.is_empty() {
        return None;
    }
    let text = std::str::from_utf8(&bytes).ok()?;
    Some(Zeroizing::new(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn test_registry_order_is_newest_first() {
        let names: Vec<&str> = STRATEGIES.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "salted-pbkdf2",
                "salted-pbkdf2-text-salt",
                "openssl-passphrase",
                "openssl-cbc-nosalt",
                "raw-key-ecb",
                "base64-plaintext",
            ]
        );
    }

    #[test]
    fn test_only_base64_strategy_is_unverified() {
        for strategy in STRATEGIES {
            let expected = strategy.format != EnvelopeFormat::Base64Plain;
            assert_eq!(strategy.format.is_verified(), expected, "{}", strategy.name);
        }
    }

    #[test]
    fn test_base64_plaintext_accepts_text() {
        let encoded = STANDARD.encode("plain old note");
        let text = base64_plaintext(&encoded, "ignored").unwrap();
        assert_eq!(text.as_str(), "plain old note");
    }

    #[test]
    fn test_base64_plaintext_accepts_missing_padding() {
        let text = base64_plaintext("aGk", "ignored").unwrap();
        assert_eq!(text.as_str(), "hi");
    }

    #[test]
    fn test_base64_plaintext_rejects_openssl_container() {
        let encoded = crate::crypto::openssl_encrypt(b"secret note", b"pw").unwrap();
        assert!(base64_plaintext(&encoded, "wrong").is_none());
    }

    #[test]
    fn test_base64_plaintext_reads_latin1_bytes() {
        // btoa("café au lait") in a browser
        let text = base64_plaintext("Y2Fm6SBhdSBsYWl0", "ignored").unwrap();
        assert_eq!(text.as_str(), "café au lait");
    }

    #[test]
    fn test_base64_plaintext_accepts_one_printable_char() {
        let encoded = STANDARD.encode([0x01u8, 0x02, 0x03, 0x04, 0x41]);
        let text = base64_plaintext(&encoded, "ignored").unwrap();
        assert_eq!(text.as_str(), "\u{1}\u{2}\u{3}\u{4}A");
    }

    #[test]
    fn test_base64_plaintext_rejects_control_bytes_only() {
        let encoded = STANDARD.encode([0x01u8, 0x02, 0x03, 0x7f]);
        assert!(base64_plaintext(&encoded, "ignored").is_none());
    }

    #[test]
    fn test_base64_plaintext_rejects_json() {
        assert!(base64_plaintext(r#"{"salt":"a","data":"b"}"#, "x").is_none());
    }

    #[test]
    fn test_raw_key_ecb_requires_aes_key_length() {
        let body = STANDARD.encode([0u8; 16]);
        assert!(raw_key_ecb(&body, "not-16-bytes").is_none());
    }

    #[test]
    fn test_raw_key_ecb_decrypts() {
        let key = "0123456789abcdef";
        let ciphertext = ecb_fixture(key, "ecb note");
        let text = raw_key_ecb(&ciphertext, key).unwrap();
        assert_eq!(text.as_str(), "ecb note");
    }

    fn ecb_fixture(key: &str, plaintext: &str) -> String {
        let ct = crate::crypto::aes_ecb_encrypt(key.as_bytes(), plaintext.as_bytes()).unwrap();
        STANDARD.encode(ct)
    }
}
