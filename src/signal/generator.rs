//! Quantized raw readings, sigmoid remapping, and outlier rejection.

use crate::signal::gaussian::GaussianSampler;
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Number of raw readings per invocation.
pub const SIGNAL_COUNT: usize = 64;

/// Center of the quantized raw distribution.
const RAW_CENTER: f64 = 127.0;

/// Spread (standard deviation) of the quantized raw distribution.
const RAW_SPREAD: f64 = 40.0;

/// Divisor applied before the sigmoid remap.
const SIGMOID_SCALE: f64 = 20.0;

/// Retention band for the outlier filter, in standard deviations.
const OUTLIER_SIGMA: f64 = 3.0;

/// One invocation's worth of synthetic readings.
///
/// The filtered views are value-membership subsets of `mapped_outputs`
/// (never longer), each produced from the same unfiltered set: one pass
/// and two passes of outlier rejection respectively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSet {
    /// Quantized raw readings in [0, 255], one per sample
    pub raw_readings: Vec<u8>,
    /// Sigmoid-mapped outputs in (0, 1), same order as the raw readings
    pub mapped_outputs: Vec<f64>,
    /// Mapped outputs after one outlier-rejection pass
    pub filtered_once: Vec<f64>,
    /// Mapped outputs after two outlier-rejection passes
    pub filtered_twice: Vec<f64>,
}

/// Builds [`SignalSet`]s from a Gaussian sampler.
pub struct SignalGenerator<R: Rng> {
    sampler: GaussianSampler<R>,
}

impl SignalGenerator<rand::rngs::ThreadRng> {
    /// Create a generator backed by the thread-local PRNG.
    pub fn from_entropy() -> Self {
        Self::new(GaussianSampler::from_entropy())
    }
}

impl<R: Rng> SignalGenerator<R> {
    /// Create a generator over the given sampler.
    pub fn new(sampler: GaussianSampler<R>) -> Self {
        Self { sampler }
    }

    /// Generate `count` readings and both filtered views.
    pub fn generate(&mut self, count: usize) -> SignalSet {
        let raw_readings: Vec<u8> = (0..count).map(|_| self.sample_raw()).collect();

        let mapped_outputs: Vec<f64> = raw_readings
            .iter()
            .map(|&raw| sigmoid((f64::from(raw) - RAW_CENTER) / SIGMOID_SCALE))
            .collect();

        // Both views start from the unfiltered set; the 2-pass view is not
        // chained off the 1-pass result.
        let filtered_once = reject_outliers(&mapped_outputs, 1);
        let filtered_twice = reject_outliers(&mapped_outputs, 2);

        SignalSet {
            raw_readings,
            mapped_outputs,
            filtered_once,
            filtered_twice,
        }
    }

    /// One quantized raw reading: `round(127 + 40·g)` clamped to [0, 255].
    fn sample_raw(&mut self) -> u8 {
        let value = RAW_CENTER + RAW_SPREAD * self.sampler.sample();
        value.round().clamp(0.0, 255.0) as u8
    }
}

/// Logistic transfer function; strictly within (0,1) for finite input.
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Apply `passes` rounds of 3-sigma outlier rejection.
///
/// Each pass computes the mean and population standard deviation of the
/// current set and retains only values within [`OUTLIER_SIGMA`] standard
/// deviations. Later passes operate on the already-filtered set. A
/// degenerate set (standard deviation 0) is retained unchanged.
fn reject_outliers(values: &[f64], passes: usize) -> Vec<f64> {
    let mut current = values.to_vec();

    for _ in 0..passes {
        if current.is_empty() {
            break;
        }

        let mean = (&current).mean();
        let sd = (&current).population_std_dev();
        if sd == 0.0 {
            continue;
        }

        current.retain(|&v| (v - mean).abs() <= OUTLIER_SIGMA * sd);
    }

    current
}
