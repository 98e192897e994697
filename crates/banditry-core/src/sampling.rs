//! Gamma, Beta and standard-normal variate generation.
//!
//! All samplers are generic over [`rand::Rng`], so they run on the seeded
//! trajectory generator as well as on the estimator's own Xoshiro stream.

use core::f64::consts::PI;

use rand::Rng;

use crate::error::{Error, Result};

/// Sample from the standard normal distribution using the Box-Muller transform.
///
/// Consumes exactly two uniforms. The first is reflected to `(0, 1]` so the
/// logarithm stays finite.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Sample from Gamma(shape, 1).
///
/// For shape ≥ 1 this is Marsaglia and Tsang's method: transform a standard
/// normal draw, accept through the squeeze `u < 1 − 0.0331 x⁴`, otherwise
/// through `ln u < x²/2 + d(1 − v + ln v)`. For shape < 1 it boosts:
/// Gamma(a) = Gamma(a + 1) · U^(1/a).
///
/// # Errors
///
/// [`Error::InvalidShape`] if `shape` is not a positive finite number.
pub fn sample_gamma<R: Rng + ?Sized>(shape: f64, rng: &mut R) -> Result<f64> {
    if !(shape > 0.0 && shape.is_finite()) {
        return Err(Error::InvalidShape { shape });
    }
    Ok(gamma_unchecked(shape, rng))
}

fn gamma_unchecked<R: Rng + ?Sized>(shape: f64, rng: &mut R) -> f64 {
    if shape < 1.0 {
        let boosted = gamma_unchecked(shape + 1.0, rng);
        let u: f64 = rng.random();
        return boosted * u.powf(1.0 / shape);
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();

    loop {
        let (x, v) = loop {
            let x = standard_normal(rng);
            let v = 1.0 + c * x;
            if v > 0.0 {
                break (x, v);
            }
        };
        let v = v * v * v;
        let u: f64 = rng.random();
        let x2 = x * x;
        if u < 1.0 - 0.0331 * x2 * x2 {
            return d * v;
        }
        if u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
            return d * v;
        }
    }
}

/// Sample from Beta(alpha, beta) as X / (X + Y) with X ~ Gamma(alpha), Y ~ Gamma(beta).
///
/// # Errors
///
/// [`Error::InvalidBelief`] if either parameter is not a positive finite number.
pub fn sample_beta<R: Rng + ?Sized>(alpha: f64, beta: f64, rng: &mut R) -> Result<f64> {
    if !(alpha > 0.0 && alpha.is_finite() && beta > 0.0 && beta.is_finite()) {
        return Err(Error::InvalidBelief { alpha, beta });
    }
    let x = gamma_unchecked(alpha, rng);
    let y = gamma_unchecked(beta, rng);
    let total = x + y;
    // Both draws can underflow to zero for tiny shapes.
    if total > 0.0 {
        Ok(x / total)
    } else {
        Ok(alpha / (alpha + beta))
    }
}
