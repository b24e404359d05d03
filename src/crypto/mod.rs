//! Cryptographic primitives for the sealing pipeline.
//!
//! Pure functions with deterministic outputs; callers provide all
//! randomness. Key material follows a create-use-discard lifecycle: every
//! invocation derives a fresh key, which structurally prevents nonce reuse
//! under a repeated key.

pub mod aead;
pub mod hkdf;

pub use aead::{decrypt, encrypt, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use hkdf::{derive, MAX_OUTPUT_LEN};

/// Crypto error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// Key material has the wrong length for the cipher
    InvalidKeyMaterial,
    /// Nonce/IV has the wrong length for the cipher
    InvalidNonceLength,
    /// Requested key derivation output exceeds the single-byte counter range
    DerivationLengthExceeded,
    /// Authentication tag did not verify (decrypt side only)
    AuthenticationFailed,
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CryptoError::InvalidKeyMaterial => {
                write!(f, "key material must be exactly {KEY_LEN} bytes")
            }
            CryptoError::InvalidNonceLength => {
                write!(f, "nonce must be exactly {NONCE_LEN} bytes")
            }
            CryptoError::DerivationLengthExceeded => {
                write!(f, "derived length must not exceed {MAX_OUTPUT_LEN} bytes")
            }
            CryptoError::AuthenticationFailed => {
                write!(f, "authentication tag verification failed")
            }
        }
    }
}

impl std::error::Error for CryptoError {}
