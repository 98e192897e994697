//! Error type for validation failures and aborted runs.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported synchronously by the numerical core.
///
/// Nothing here is retried: every variant means the caller supplied an input
/// outside the documented domain, or a run produced a value that cannot be
/// recorded faithfully.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Beta parameters must both be strictly positive and finite.
    #[error("invalid Beta parameters: alpha = {alpha}, beta = {beta} (both must be > 0)")]
    InvalidBelief {
        /// Offending α.
        alpha: f64,
        /// Offending β.
        beta: f64,
    },

    /// A success rate outside [0, 1].
    #[error("invalid success rate {rate} for option {arm} (must be in [0, 1])")]
    InvalidRate {
        /// Option the rate belongs to.
        arm: crate::types::Arm,
        /// Offending rate.
        rate: f64,
    },

    /// A mean that is not a finite number.
    #[error("invalid mean {mean} for option {arm} (must be finite)")]
    InvalidMean {
        /// Option the mean belongs to.
        arm: crate::types::Arm,
        /// Offending mean.
        mean: f64,
    },

    /// Noise standard deviation for continuous rewards must be positive.
    #[error("invalid noise standard deviation {sigma} (must be > 0)")]
    InvalidNoise {
        /// Offending σ.
        sigma: f64,
    },

    /// Stopping error rate δ must lie strictly inside (0, 1).
    #[error("invalid stopping threshold delta = {delta} (must be in (0, 1))")]
    InvalidThreshold {
        /// Offending δ.
        delta: f64,
    },

    /// Log Bayes factor boundaries must satisfy lower < 0 < upper.
    #[error("invalid boundaries [{lower}, {upper}] (need lower < 0 < upper)")]
    InvalidBoundary {
        /// Lower boundary.
        lower: f64,
        /// Upper boundary.
        upper: f64,
    },

    /// Horizon (number of steps or pulls) must be positive.
    #[error("horizon must be positive")]
    InvalidHorizon,

    /// Policy parameters outside their domain.
    #[error("invalid policy parameters: {0}")]
    InvalidPolicy(&'static str),

    /// Gamma shape must be strictly positive and finite.
    #[error("invalid gamma shape {shape} (must be > 0)")]
    InvalidShape {
        /// Offending shape.
        shape: f64,
    },

    /// Monte Carlo estimates need at least one sample.
    #[error("Monte Carlo sample count must be positive")]
    InvalidSampleCount,

    /// A simulated quantity was NaN or infinite; the whole run is discarded.
    #[error("non-finite {quantity} at step {step}")]
    NonFinite {
        /// 1-based step at which the value appeared.
        step: usize,
        /// Name of the quantity.
        quantity: &'static str,
    },
}
