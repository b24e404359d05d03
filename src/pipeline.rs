//! Top-level sealing pipeline.
//!
//! One `Result`-returning entry point per invocation: generate the signal
//! set, mint a transaction context, assemble the wire plaintext, and seal
//! it. Each step's typed error propagates unchanged; the caller never sees
//! a partially derived or partially encrypted result. Invocations share no
//! state and may run in parallel.

use crate::device::{BrowserSnapshot, MediaDeviceInfo};
use crate::entropy::SecureRandom;
use crate::payload::{self, PayloadError, SealedPayload, TransactionContext};
use crate::signal::{SignalGenerator, SIGNAL_COUNT};
use rand::Rng;

/// Everything the transport layer needs from one invocation.
#[derive(Debug, Clone)]
pub struct Submission {
    pub sealed: SealedPayload,
    pub transaction_id: String,
    pub timestamp_millis: i64,
}

/// Pipeline errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Payload assembly or sealing failed
    Payload(PayloadError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Payload(e) => write!(f, "pipeline failed: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<PayloadError> for PipelineError {
    fn from(e: PayloadError) -> Self {
        PipelineError::Payload(e)
    }
}

/// Run one full invocation: generate, assemble, seal.
///
/// `generator` supplies statistical randomness for the signal set;
/// `entropy` supplies cryptographic randomness for the transaction context
/// and the IV. The two are deliberately separate parameters.
pub fn run<R: Rng>(
    generator: &mut SignalGenerator<R>,
    entropy: &mut impl SecureRandom,
    browser: BrowserSnapshot,
    media: MediaDeviceInfo,
) -> Result<Submission, PipelineError> {
    let signals = generator.generate(SIGNAL_COUNT);
    let context = TransactionContext::new(entropy);

    let payload = payload::assemble(&context, &signals, browser, media);
    let sealed = payload::seal(entropy, &context, &payload)?;

    Ok(Submission {
        sealed,
        transaction_id: context.transaction_id,
        timestamp_millis: context.timestamp_millis,
    })
}

/// Run one invocation with the default sources and a locally detected
/// snapshot.
pub fn run_with_defaults() -> Result<Submission, PipelineError> {
    let mut generator = SignalGenerator::from_entropy();
    let mut entropy = crate::entropy::OsSecureRandom;
    run(
        &mut generator,
        &mut entropy,
        BrowserSnapshot::detect(),
        MediaDeviceInfo::default(),
    )
}
