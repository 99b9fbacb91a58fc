//! AES block-mode helpers and the OpenSSL "Salted__" container.
//!
//! Everything returned across the module boundary is Base64 text, which is
//! how envelopes are stored.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use super::kdf::{openssl_key_iv, random_bytes};
use crate::error::{Result, VaultError};

/// Magic prefix of an OpenSSL salted container.
pub const OPENSSL_MAGIC: &[u8; 8] = b"Salted__";

/// Salt length inside an OpenSSL salted container.
pub const OPENSSL_SALT_LENGTH: usize = 8;

const BLOCK_SIZE: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256-CBC encrypt with PKCS#7 padding.
pub fn aes_cbc_encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let encryptor = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| VaultError::Crypto(format!("Invalid CBC key or IV: {}", e)))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// AES-256-CBC decrypt with PKCS#7 padding.
pub fn aes_cbc_decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    check_block_aligned(ciphertext)?;
    let decryptor = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| VaultError::Crypto(format!("Invalid CBC key or IV: {}", e)))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| VaultError::Crypto("Invalid padding".to_string()))
}

/// AES-ECB encrypt with PKCS#7 padding; key length selects AES-128/192/256.
pub fn aes_ecb_encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let ciphertext = match key.len() {
        16 => ecb::Encryptor::<aes::Aes128>::new_from_slice(key)
            .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        24 => ecb::Encryptor::<aes::Aes192>::new_from_slice(key)
            .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        32 => ecb::Encryptor::<aes::Aes256>::new_from_slice(key)
            .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        other => return Err(unsupported_key_length(other)),
    };
    ciphertext.map_err(|e| VaultError::Crypto(format!("Invalid ECB key: {}", e)))
}

/// AES-ECB decrypt with PKCS#7 padding; key length selects AES-128/192/256.
pub fn aes_ecb_decrypt(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    check_block_aligned(ciphertext)?;
    let plaintext = match key.len() {
        16 => ecb::Decryptor::<aes::Aes128>::new_from_slice(key)
            .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)),
        24 => ecb::Decryptor::<aes::Aes192>::new_from_slice(key)
            .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)),
        32 => ecb::Decryptor::<aes::Aes256>::new_from_slice(key)
            .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)),
        other => return Err(unsupported_key_length(other)),
    };
    plaintext
        .map_err(|e| VaultError::Crypto(format!("Invalid ECB key: {}", e)))?
        .map_err(|_| VaultError::Crypto("Invalid padding".to_string()))
}

/// Encrypt the way `openssl enc -aes-256-cbc -md md5 -a` does.
///
/// A fresh 8-byte salt is drawn per call; the output is
/// `base64("Salted__" || salt || ciphertext)`.
pub fn openssl_encrypt(plaintext: &[u8], password: &[u8]) -> Result<String> {
    let salt: [u8; OPENSSL_SALT_LENGTH] = random_bytes()?;
    let derived = openssl_key_iv(password, Some(&salt[..]));
    let ciphertext = aes_cbc_encrypt(&derived.key, &derived.iv, plaintext)?;

    let mut container = Vec::with_capacity(16 + ciphertext.len());
    container.extend_from_slice(OPENSSL_MAGIC);
    container.extend_from_slice(&salt);
    container.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(container))
}

/// Decrypt a Base64 OpenSSL salted container.
///
/// Fails when the text is not Base64, lacks the `Salted__` header, or the
/// padding does not check out under the derived key.
pub fn openssl_decrypt(encoded: &str, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let container = decode_base64(encoded)?;
    if !has_openssl_header(&container) {
        return Err(VaultError::Crypto("Missing Salted__ header".to_string()));
    }
    let salt = &container[OPENSSL_MAGIC.len()..OPENSSL_MAGIC.len() + OPENSSL_SALT_LENGTH];
    let derived = openssl_key_iv(password, Some(salt));
    let body = &container[OPENSSL_MAGIC.len() + OPENSSL_SALT_LENGTH..];
    aes_cbc_decrypt(&derived.key, &derived.iv, body).map(Zeroizing::new)
}

/// Encrypt without a salt, matching `openssl enc -nosalt`.
pub fn openssl_encrypt_unsalted(plaintext: &[u8], password: &[u8]) -> Result<String> {
    let derived = openssl_key_iv(password, None);
    let ciphertext = aes_cbc_encrypt(&derived.key, &derived.iv, plaintext)?;
    Ok(STANDARD.encode(ciphertext))
}

/// Decrypt a Base64 headerless CBC body whose key/IV come from an unsalted
/// `EVP_BytesToKey` run.
pub fn openssl_decrypt_unsalted(encoded: &str, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let body = decode_base64(encoded)?;
    if has_openssl_header(&body) {
        return Err(VaultError::Crypto(
            "Salted container passed to unsalted decoder".to_string(),
        ));
    }
    let derived = openssl_key_iv(password, None);
    aes_cbc_decrypt(&derived.key, &derived.iv, &body).map(Zeroizing::new)
}

/// Whether raw bytes start with an OpenSSL salted container header.
pub fn has_openssl_header(bytes: &[u8]) -> bool {
    bytes.len() >= OPENSSL_MAGIC.len() + OPENSSL_SALT_LENGTH && bytes.starts_with(OPENSSL_MAGIC)
}

pub(crate) fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded.trim().as_bytes())
        .map_err(|e| VaultError::Crypto(format!("Invalid Base64: {}", e)))
}

fn check_block_aligned(ciphertext: &[u8]) -> Result<()> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(VaultError::Crypto(format!(
            "Ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }
    Ok(())
}

fn unsupported_key_length(len: usize) -> VaultError {
    VaultError::Crypto(format!(
        "Unsupported AES key length {} (expected 16, 24 or 32)",
        len
    ))
}
