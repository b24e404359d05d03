//! Agegate Client - sealing pipeline for age verification payloads.
//!
//! This library assembles a payload of synthetic measurement data, derives
//! a per-transaction symmetric key from ephemeral randomness, encrypts the
//! payload under an authenticated cipher, and hands the result to a
//! transport layer.
//!
//! # Key Lifecycle
//!
//! Every invocation mints a fresh transaction context (random nonce +
//! UUID + timestamp), derives a one-off 256-bit key from it via
//! HKDF-SHA256, and discards the key after a single AES-256-GCM
//! encryption. Nothing is persisted or reused across invocations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Agegate Client                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────┐   ┌───────────┐              │
//! │  │  Signal   │──▶│  Payload  │──▶│   Seal    │              │
//! │  │ Generator │   │ Assembler │   │(HKDF+GCM) │              │
//! │  └───────────┘   └───────────┘   └───────────┘              │
//! │        │               ▲               │                    │
//! │        ▼               │               ▼                    │
//! │  ┌───────────┐   ┌───────────┐   ┌───────────┐              │
//! │  │ Gaussian  │   │  Device   │   │ Transport │              │
//! │  │  Sampler  │   │ Snapshot  │   │  Adapter  │              │
//! │  └───────────┘   └───────────┘   └───────────┘              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use agegate_client::pipeline;
//! use agegate_client::transport::SubmissionRequest;
//!
//! let submission = pipeline::run_with_defaults().expect("sealing failed");
//! let request = SubmissionRequest::encode(&submission);
//! println!("{}", serde_json::to_string(&request).unwrap());
//! ```

pub mod config;
pub mod crypto;
pub mod device;
pub mod entropy;
pub mod payload;
pub mod pipeline;
pub mod signal;
pub mod transport;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use crypto::CryptoError;
pub use device::{BrowserSnapshot, MediaDeviceInfo};
pub use entropy::{OsSecureRandom, SecureRandom};
pub use payload::{PayloadError, SealedPayload, TransactionContext, WirePayload};
pub use pipeline::{PipelineError, Submission};
pub use signal::{GaussianSampler, SignalGenerator, SignalSet, SIGNAL_COUNT};
pub use transport::{SubmissionRequest, SubmissionResponse, TransportConfig, TransportError};

// Transport client re-exports (when enabled)
#[cfg(feature = "transport")]
pub use transport::{BlockingTransportClient, TransportClient};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
