//! Cryptographic primitives for VaultNote.
//!
//! This module wraps the RustCrypto implementations the envelope codec is
//! built from:
//! - **PBKDF2-HMAC-SHA256**: key derivation for salted envelopes
//! - **EVP_BytesToKey (MD5)**: OpenSSL-compatible passphrase derivation used
//!   by legacy envelopes
//! - **AES** in CBC and ECB modes with PKCS#7 padding
//!
//! ## Security Model
//!
//! The parameters here are fixed for read compatibility with notes written
//! by earlier releases. They are not a hardening target: the iteration count
//! is low and no envelope carries an authentication tag. Changing any of
//! them requires a new envelope format, not an edit in place.

pub mod cipher;
pub mod kdf;
pub mod passphrase;

pub use cipher::{
    aes_cbc_decrypt, aes_cbc_encrypt, aes_ecb_decrypt, aes_ecb_encrypt, openssl_decrypt,
    openssl_decrypt_unsalted, openssl_encrypt, openssl_encrypt_unsalted,
};
pub use kdf::{derive_key, openssl_key_iv, random_bytes, DerivedKey, PBKDF2_ITERATIONS, SALT_LENGTH};
pub use passphrase::{evaluate_strength, validate_passphrase, PassphraseStrength, StrengthReport};
