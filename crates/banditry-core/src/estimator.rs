//! Monte Carlo estimate of the probability that option A is best.
//!
//! P(θ_A > θ_B) for independent Beta posteriors has no simple closed form,
//! so it is estimated by drawing posterior pairs and counting how often A's
//! draw is larger. Each call seeds its own Xoshiro256++ stream: the estimate
//! is reproducible for a given seed and never consumes draws from a
//! trajectory's generator.
//!
//! The result is an estimate, not an exact value. Its standard error is
//! √(p(1−p)/n), shrinking as 1/√n in the number of samples.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::belief::BetaBelief;
use crate::error::{Error, Result};
use crate::sampling::sample_beta;

/// Estimate P(θ_A > θ_B) from `n_samples` posterior draws seeded with `seed`.
///
/// # Errors
///
/// [`Error::InvalidSampleCount`] if `n_samples` is zero.
pub fn prob_a_best(a: &BetaBelief, b: &BetaBelief, n_samples: usize, seed: u64) -> Result<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    prob_a_best_with_rng(a, b, n_samples, &mut rng)
}

/// Estimate P(θ_A > θ_B) using a caller-supplied generator.
///
/// Draws alternate θ_A then θ_B for each of the `n_samples` pairs.
///
/// # Errors
///
/// [`Error::InvalidSampleCount`] if `n_samples` is zero.
pub fn prob_a_best_with_rng<R: Rng + ?Sized>(
    a: &BetaBelief,
    b: &BetaBelief,
    n_samples: usize,
    rng: &mut R,
) -> Result<f64> {
    if n_samples == 0 {
        return Err(Error::InvalidSampleCount);
    }
    let mut wins = 0usize;
    for _ in 0..n_samples {
        let theta_a = sample_beta(a.alpha(), a.beta(), rng)?;
        let theta_b = sample_beta(b.alpha(), b.beta(), rng)?;
        if theta_a > theta_b {
            wins += 1;
        }
    }
    Ok(wins as f64 / n_samples as f64)
}

/// Binomial standard error √(p(1−p)/n) of a Monte Carlo proportion.
pub fn standard_error(p: f64, n_samples: usize) -> f64 {
    if n_samples == 0 {
        return f64::INFINITY;
    }
    (p * (1.0 - p) / n_samples as f64).sqrt()
}
