//! Standard normal sampling via the Box–Muller transform.

use rand::Rng;
use std::f64::consts::PI;

/// Samples from a standard normal distribution (mean 0, standard
/// deviation 1) using two independent uniform(0,1) draws.
///
/// Generic over the underlying uniform source so tests can seed a
/// deterministic PRNG. The process is reproducible, the exact values are
/// not; distributional tests belong in the callers.
pub struct GaussianSampler<R: Rng> {
    rng: R,
}

impl GaussianSampler<rand::rngs::ThreadRng> {
    /// Create a sampler backed by the thread-local PRNG.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> GaussianSampler<R> {
    /// Create a sampler over the given uniform source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw one standard normal sample: `sqrt(-2·ln(u)) · cos(2π·v)`.
    pub fn sample(&mut self) -> f64 {
        let u = self.nonzero_uniform();
        let v = self.nonzero_uniform();
        (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
    }

    /// Uniform(0,1) draw, re-drawn if exactly 0 to avoid ln(0).
    fn nonzero_uniform(&mut self) -> f64 {
        loop {
            let u: f64 = self.rng.gen();
            if u != 0.0 {
                return u;
            }
        }
    }
}
