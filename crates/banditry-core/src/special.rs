//! Special functions: log-gamma, digamma and log-beta.
//!
//! `ln_gamma` feeds the Beta-distribution KL divergence and log-beta terms;
//! `digamma` feeds the one-step information gain in [`crate::information`].

use core::f64::consts::PI;

use crate::constants::LOG_2PI;

/// Lanczos parameter g.
const LANCZOS_G: f64 = 7.0;

/// Lanczos coefficients for g = 7, n = 9.
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Below this argument the digamma asymptotic series is not used.
const DIGAMMA_ASYMPTOTIC_CUTOFF: f64 = 6.0;

/// Natural log of |Γ(x)|.
///
/// Lanczos approximation for x ≥ 0.5 (relative error around 1e-13 for
/// moderate arguments). For x < 0.5 the reflection formula
/// Γ(x)Γ(1−x) = π / sin(πx) is applied. Returns `+∞` at the poles
/// (x = 0, −1, −2, …) and NaN for NaN input.
pub fn ln_gamma(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    // sin(πx) is only approximately zero at the poles.
    if x <= 0.0 && x == x.floor() {
        return f64::INFINITY;
    }
    if x < 0.5 {
        let sin_val = (PI * x).sin();
        return (PI / sin_val.abs()).ln() - ln_gamma(1.0 - x);
    }

    let z = x - 1.0;
    let mut acc = LANCZOS_COEFFS[0];
    for (i, coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        acc += coeff / (z + i as f64);
    }
    let t = z + LANCZOS_G + 0.5;
    0.5 * LOG_2PI + (z + 0.5) * t.ln() - t + acc.ln()
}

/// Digamma function ψ(x) = d/dx ln Γ(x).
///
/// Negative non-integers are reflected first with
/// ψ(x) = ψ(1 − x) − π·cot(πx). Remaining arguments below the asymptotic
/// cutoff are shifted upward with ψ(x) = ψ(x+1) − 1/x, then the
/// asymptotic series
///
/// ψ(x) ≈ ln x − 1/(2x) − 1/(12x²) + 1/(120x⁴) − 1/(252x⁶)
///
/// is evaluated at x ≥ 6, where its truncation error is below 3e-9.
/// The series diverges for small x, which is why the shift is required.
/// Returns NaN at the poles (x = 0, −1, −2, …).
pub fn digamma(x: f64) -> f64 {
    if x.is_nan() || (x <= 0.0 && x == x.floor()) {
        return f64::NAN;
    }
    if x < 0.0 {
        return digamma(1.0 - x) - PI / (PI * x).tan();
    }

    let mut x = x;
    let mut result = 0.0;
    while x < DIGAMMA_ASYMPTOTIC_CUTOFF {
        result -= 1.0 / x;
        x += 1.0;
    }

    let x2 = x * x;
    let x4 = x2 * x2;
    result + x.ln() - 1.0 / (2.0 * x) - 1.0 / (12.0 * x2) + 1.0 / (120.0 * x4)
        - 1.0 / (252.0 * x4 * x2)
}

/// Natural log of the Beta function B(a, b).
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}
