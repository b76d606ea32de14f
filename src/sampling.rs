//! Monte-Carlo averaging of noisy estimators.
//!
//! Invariant: trial `t` always draws from the substream `substream_seed(seed, &[t])`, so
//! [`mean_of_trials`] returns the same value serially and under the `parallel` feature,
//! independent of Rayon thread count.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// SplitMix64 finalizer.
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}

/// Derive an independent child seed from `seed` and a path of stream coordinates.
pub fn substream_seed(seed: u64, path: &[u64]) -> u64 {
    path.iter().fold(mix64(seed), |acc, &p| mix64(acc ^ mix64(p.wrapping_add(0x9e3779b97f4a7c15))))
}

/// Draw `trials` i.i.d. samples of `f` and reduce by mean. Zero trials yield `0.0`.
///
/// Each trial gets its own `ChaCha8Rng` seeded from `(seed, trial)`.
pub fn mean_of_trials<F>(trials: usize, seed: u64, f: F) -> f64
where
    F: Fn(&mut ChaCha8Rng) -> f64 + Sync,
{
    if trials == 0 {
        return 0.0;
    }
    let sample = |t: usize| {
        let mut rng = ChaCha8Rng::seed_from_u64(substream_seed(seed, &[t as u64]));
        f(&mut rng)
    };

    #[cfg(feature = "parallel")]
    let total: f64 = {
        use rayon::prelude::*;
        // Collect first so the summation order is fixed.
        let samples: Vec<f64> = (0..trials).into_par_iter().map(sample).collect();
        samples.iter().sum()
    };
    #[cfg(not(feature = "parallel"))]
    let total: f64 = (0..trials).map(sample).sum();

    total / trials as f64
}
