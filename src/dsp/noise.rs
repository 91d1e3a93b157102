//! Deterministic noise buffers for swept-noise sources.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `duration` seconds of uniform noise in [-1, 1].
///
/// The generator is seeded, so the same call always yields the same
/// buffer; tests and repeated cues are bit-identical.
pub fn noise_buffer(duration: f64, sample_rate: f64, seed: u64) -> Vec<f64> {
    let num_samples = (duration * sample_rate) as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_samples).map(|_| rng.gen_range(-1.0..=1.0)).collect()
}
