//! Synthetic signal generation.
//!
//! Produces the measurement-shaped plaintext the pipeline seals: Gaussian
//! raw readings quantized to [0,255], a sigmoid remap into (0,1), and
//! iterative outlier rejection over the mapped values.

pub mod gaussian;
pub mod generator;

pub use gaussian::GaussianSampler;
pub use generator::{SignalGenerator, SignalSet, SIGNAL_COUNT};
