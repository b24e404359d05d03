//! Randomness sources for the sealing pipeline.
//!
//! Two kinds of randomness are needed and they must not be conflated:
//! statistical sampling (any quality PRNG, used by the signal generator)
//! and cryptographic nonce/identifier generation (must come from the OS
//! CSPRNG). Statistical sampling stays generic over [`rand::Rng`]; this
//! module only defines the cryptographic side, so the distinction is
//! enforced by type rather than convention.

use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

/// Cryptographically strong randomness for nonces, IVs, and transaction ids.
pub trait SecureRandom {
    /// Fill `dest` with cryptographically strong random bytes.
    fn fill_bytes(&mut self, dest: &mut [u8]);

    /// Generate a random 128-bit transaction identifier in canonical
    /// hyphenated form.
    fn transaction_id(&mut self) -> String;
}

/// [`SecureRandom`] backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSecureRandom;

impl SecureRandom for OsSecureRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }

    fn transaction_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}
