//! AES-256-GCM authenticated encryption, no associated data.

use crate::crypto::CryptoError;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};

/// Required key length in bytes.
pub const KEY_LEN: usize = 32;

/// Required nonce (IV) length in bytes.
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under `key` and `iv`, returning the ciphertext and
/// the 128-bit authentication tag separately.
///
/// The tag is the last [`TAG_LEN`] bytes of the cipher's combined output;
/// the ciphertext is everything before it. The nonce must never be reused
/// under the same key; callers derive a fresh key per invocation.
pub fn encrypt(
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_LEN]), CryptoError> {
    let cipher = cipher_for(key, iv)?;

    let mut combined = cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|_| CryptoError::InvalidKeyMaterial)?;

    let tag_start = combined.len() - TAG_LEN;
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&combined[tag_start..]);
    combined.truncate(tag_start);

    Ok((combined, tag))
}

/// Decrypt and verify; fails with [`CryptoError::AuthenticationFailed`] if
/// the tag does not verify or the ciphertext was tampered with.
pub fn decrypt(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = cipher_for(key, iv)?;

    let mut combined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    combined.extend_from_slice(ciphertext);
    combined.extend_from_slice(tag);

    cipher
        .decrypt(Nonce::from_slice(iv), combined.as_slice())
        .map_err(|_| CryptoError::AuthenticationFailed)
}

/// Validate lengths and build the cipher instance.
fn cipher_for(key: &[u8], iv: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::InvalidKeyMaterial);
    }
    if iv.len() != NONCE_LEN {
        return Err(CryptoError::InvalidNonceLength);
    }
    Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)))
}
