//! Payload assembly and sealing.
//!
//! Merges a [`SignalSet`] with the host-supplied device attributes and a
//! timestamp into the wire plaintext, then derives a fresh per-transaction
//! key and encrypts. Every entity here is owned by the single invocation
//! that created it; nothing is cached or reused across calls.

use crate::crypto::{self, CryptoError};
use crate::device::{BrowserSnapshot, MediaDeviceInfo};
use crate::entropy::SecureRandom;
use crate::signal::SignalSet;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// HKDF salt binding derived keys to this payload format version.
pub const KDF_SALT: &[u8] = b"age-verify-salt-v2";

/// HKDF context string binding derived keys to their usage.
pub const KDF_INFO: &[u8] = b"age-verify-context";

/// Fixed wire discriminator for this payload kind.
pub const PAYLOAD_METHOD: u32 = 3;

/// Length of the per-transaction random nonce in the input keying material.
pub const IKM_NONCE_LEN: usize = 16;

/// Magnitudes of the scaled shift fields; the timestamp selects the sign.
const X_SHIFT_MAGNITUDE: f64 = 0.0005;
const Y_SHIFT_MAGNITUDE: f64 = 0.0002;

/// Spacing of the state timeline ticks in milliseconds.
const TIMELINE_STEP_MS: f64 = 100.0;

/// Per-invocation transaction metadata, consumed as key-derivation input.
///
/// Created once per call and never reused; the fresh nonce and transaction
/// id make the derived key unique per invocation.
#[derive(Debug, Clone)]
pub struct TransactionContext {
    /// 128-bit random identifier in canonical string form
    pub transaction_id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_millis: i64,
    /// Random bytes mixed into the input keying material
    pub nonce: [u8; IKM_NONCE_LEN],
}

impl TransactionContext {
    /// Create a fresh context from the secure randomness source.
    pub fn new(entropy: &mut impl SecureRandom) -> Self {
        let mut nonce = [0u8; IKM_NONCE_LEN];
        entropy.fill_bytes(&mut nonce);

        Self {
            transaction_id: entropy.transaction_id(),
            timestamp_millis: Utc::now().timestamp_millis(),
            nonce,
        }
    }

    /// Input keying material: `nonce(16) || timestamp(8, big-endian) ||
    /// transaction_id(UTF-8)`.
    pub fn input_key_material(&self) -> Vec<u8> {
        let mut ikm = Vec::with_capacity(IKM_NONCE_LEN + 8 + self.transaction_id.len());
        ikm.extend_from_slice(&self.nonce);
        ikm.extend_from_slice(&self.timestamp_millis.to_be_bytes());
        ikm.extend_from_slice(self.transaction_id.as_bytes());
        ikm
    }
}

/// Prediction block of the wire plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
    /// Mapped outputs after one outlier-rejection pass
    pub outputs: Vec<f64>,
    /// Mapped outputs after two outlier-rejection passes
    pub primary_outputs: Vec<f64>,
    /// Quantized raw readings
    pub raws: Vec<u8>,
    pub x_scaled_shift_amt: f64,
    pub y_scaled_shift_amt: f64,
    pub media_device_info: MediaDeviceInfo,
    /// Interaction-telemetry shaped field; deterministic formula kept for
    /// wire compatibility only
    pub state_timeline: [f64; 5],
}

/// Plaintext structure encrypted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePayload {
    pub method: u32,
    pub predictions: Predictions,
    pub browser_fingerprint: BrowserSnapshot,
}

/// Output of one sealing invocation; destroyed after transport encoding.
#[derive(Debug, Clone)]
pub struct SealedPayload {
    pub ciphertext: Vec<u8>,
    pub auth_tag: [u8; crypto::TAG_LEN],
    pub iv: [u8; crypto::NONCE_LEN],
}

/// Payload assembly/sealing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Plaintext JSON encoding failed
    Serialization(String),
    /// Key derivation or encryption failed
    Crypto(CryptoError),
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadError::Serialization(msg) => write!(f, "payload serialization error: {msg}"),
            PayloadError::Crypto(e) => write!(f, "payload crypto error: {e}"),
        }
    }
}

impl std::error::Error for PayloadError {}

impl From<CryptoError> for PayloadError {
    fn from(e: CryptoError) -> Self {
        PayloadError::Crypto(e)
    }
}

/// Select the signed shift amounts from the transaction timestamp.
///
/// Millisecond remainders below 500 select the positive magnitudes.
pub fn shift_amounts(timestamp_millis: i64) -> (f64, f64) {
    if timestamp_millis.rem_euclid(1000) < 500 {
        (X_SHIFT_MAGNITUDE, Y_SHIFT_MAGNITUDE)
    } else {
        (-X_SHIFT_MAGNITUDE, -Y_SHIFT_MAGNITUDE)
    }
}

/// Five monotonically increasing millisecond ticks ending at the
/// transaction timestamp.
fn state_timeline(timestamp_millis: i64) -> [f64; 5] {
    let end = timestamp_millis as f64;
    [
        end - 4.0 * TIMELINE_STEP_MS,
        end - 3.0 * TIMELINE_STEP_MS,
        end - 2.0 * TIMELINE_STEP_MS,
        end - TIMELINE_STEP_MS,
        end,
    ]
}

/// Merge the signal set and host-supplied attributes into the wire
/// plaintext.
pub fn assemble(
    context: &TransactionContext,
    signals: &SignalSet,
    browser: BrowserSnapshot,
    media: MediaDeviceInfo,
) -> WirePayload {
    let (x_shift, y_shift) = shift_amounts(context.timestamp_millis);

    WirePayload {
        method: PAYLOAD_METHOD,
        predictions: Predictions {
            outputs: signals.filtered_once.clone(),
            primary_outputs: signals.filtered_twice.clone(),
            raws: signals.raw_readings.clone(),
            x_scaled_shift_amt: x_shift,
            y_scaled_shift_amt: y_shift,
            media_device_info: media,
            state_timeline: state_timeline(context.timestamp_millis),
        },
        browser_fingerprint: browser,
    }
}

/// Serialize and encrypt the payload under a freshly derived key.
///
/// Derives a 32-byte key from the context's input keying material with
/// [`KDF_SALT`] / [`KDF_INFO`], then encrypts under AES-256-GCM with a
/// fresh random 12-byte IV. Any failure propagates immediately; partially
/// derived material is dropped on the way out.
pub fn seal(
    entropy: &mut impl SecureRandom,
    context: &TransactionContext,
    payload: &WirePayload,
) -> Result<SealedPayload, PayloadError> {
    let plaintext = serde_json::to_vec(payload)
        .map_err(|e| PayloadError::Serialization(e.to_string()))?;

    let key = crypto::derive(
        &context.input_key_material(),
        KDF_SALT,
        KDF_INFO,
        crypto::KEY_LEN,
    )?;

    let mut iv = [0u8; crypto::NONCE_LEN];
    entropy.fill_bytes(&mut iv);

    let (ciphertext, auth_tag) = crypto::encrypt(&key, &iv, &plaintext)?;

    Ok(SealedPayload {
        ciphertext,
        auth_tag,
        iv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::OsSecureRandom;
    use crate::signal::{GaussianSampler, SignalGenerator};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_context() -> TransactionContext {
        TransactionContext {
            transaction_id: "11111111-2222-3333-4444-555555555555".to_string(),
            timestamp_millis: 1_700_000_000_250,
            nonce: [7u8; IKM_NONCE_LEN],
        }
    }

    fn test_signals() -> SignalSet {
        let sampler = GaussianSampler::new(StdRng::seed_from_u64(5));
        SignalGenerator::new(sampler).generate(64)
    }

    #[test]
    fn test_ikm_layout() {
        let context = test_context();
        let ikm = context.input_key_material();

        assert_eq!(&ikm[..IKM_NONCE_LEN], &[7u8; IKM_NONCE_LEN]);
        assert_eq!(
            &ikm[IKM_NONCE_LEN..IKM_NONCE_LEN + 8],
            &1_700_000_000_250i64.to_be_bytes()
        );
        assert_eq!(
            &ikm[IKM_NONCE_LEN + 8..],
            context.transaction_id.as_bytes()
        );
    }

    #[test]
    fn test_shift_amounts_early_window() {
        let (x, y) = shift_amounts(1_700_000_000_250);
        assert_eq!(x, 0.0005);
        assert_eq!(y, 0.0002);
    }

    #[test]
    fn test_shift_amounts_late_window() {
        let (x, y) = shift_amounts(1_700_000_000_750);
        assert_eq!(x, -0.0005);
        assert_eq!(y, -0.0002);
    }

    #[test]
    fn test_state_timeline_monotonic() {
        let timeline = state_timeline(1_700_000_000_250);
        assert_eq!(timeline[4], 1_700_000_000_250.0);
        for pair in timeline.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_assemble_wire_shape() {
        let context = test_context();
        let signals = test_signals();
        let payload = assemble(
            &context,
            &signals,
            BrowserSnapshot::default(),
            MediaDeviceInfo::default(),
        );

        assert_eq!(payload.method, PAYLOAD_METHOD);
        assert_eq!(payload.predictions.outputs, signals.filtered_once);
        assert_eq!(payload.predictions.primary_outputs, signals.filtered_twice);
        assert_eq!(payload.predictions.raws, signals.raw_readings);

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"method\":3"));
        assert!(json.contains("\"primaryOutputs\""));
        assert!(json.contains("\"xScaledShiftAmt\""));
        assert!(json.contains("\"mediaDeviceInfo\""));
        assert!(json.contains("\"stateTimeline\""));
        assert!(json.contains("\"browserFingerprint\""));
    }

    #[test]
    fn test_wire_payload_round_trip() {
        let context = test_context();
        let payload = assemble(
            &context,
            &test_signals(),
            BrowserSnapshot::default(),
            MediaDeviceInfo::default(),
        );

        let json = serde_json::to_string(&payload).unwrap();
        let decoded: WirePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.method, payload.method);
        assert_eq!(decoded.predictions.raws, payload.predictions.raws);
        assert_eq!(
            decoded.predictions.state_timeline,
            payload.predictions.state_timeline
        );
    }

    #[test]
    fn test_seal_and_reopen() {
        let mut entropy = OsSecureRandom;
        let context = test_context();
        let payload = assemble(
            &context,
            &test_signals(),
            BrowserSnapshot::default(),
            MediaDeviceInfo::default(),
        );

        let sealed = seal(&mut entropy, &context, &payload).unwrap();
        assert!(!sealed.ciphertext.is_empty());

        // The key is re-derivable from the transaction context alone.
        let key = crypto::derive(
            &context.input_key_material(),
            KDF_SALT,
            KDF_INFO,
            crypto::KEY_LEN,
        )
        .unwrap();
        let plaintext =
            crypto::decrypt(&key, &sealed.iv, &sealed.ciphertext, &sealed.auth_tag).unwrap();
        let reopened: WirePayload = serde_json::from_slice(&plaintext).unwrap();
        assert_eq!(reopened.predictions.raws, payload.predictions.raws);
    }

    #[test]
    fn test_fresh_contexts_derive_distinct_keys() {
        let mut entropy = OsSecureRandom;
        let a = TransactionContext::new(&mut entropy);
        let b = TransactionContext::new(&mut entropy);

        assert_ne!(a.transaction_id, b.transaction_id);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.input_key_material(), b.input_key_material());
    }
}
