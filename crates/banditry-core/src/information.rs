//! Expected information gain of one more pull.
//!
//! For a Beta(α, β) belief, observing one more Bernoulli outcome moves the
//! posterior to Beta(α+1, β) or Beta(α, β+1). The information gain is the
//! expected KL divergence of that updated posterior from the current one,
//! weighted by the predictive probability of each outcome:
//!
//! IG(α, β) = μ·KL[Beta(α+1, β) ‖ Beta(α, β)] + (1 − μ)·KL[Beta(α, β+1) ‖ Beta(α, β)]
//!
//! with μ = α/(α+β). It measures how unsettled a belief is, independent of
//! the option's expected reward.

use crate::belief::BetaBelief;
use crate::special::{digamma, ln_beta};

/// KL[Beta(α+1, β) ‖ Beta(α, β)] in nats.
///
/// Closed form: ln((α+β)/α) + ψ(α+1) − ψ(α+β+1).
pub fn kl_after_success(belief: &BetaBelief) -> f64 {
    let (a, b) = (belief.alpha(), belief.beta());
    ((a + b) / a).ln() + digamma(a + 1.0) - digamma(a + b + 1.0)
}

/// KL[Beta(α, β+1) ‖ Beta(α, β)] in nats.
///
/// Closed form: ln((α+β)/β) + ψ(β+1) − ψ(α+β+1).
pub fn kl_after_failure(belief: &BetaBelief) -> f64 {
    let (a, b) = (belief.alpha(), belief.beta());
    ((a + b) / b).ln() + digamma(b + 1.0) - digamma(a + b + 1.0)
}

/// Expected KL divergence of the one-step posterior from the current belief.
///
/// Always ≥ 0; rounding noise below zero is clamped away. NaN passes
/// through unchanged.
pub fn information_gain(belief: &BetaBelief) -> f64 {
    let mu = belief.mean();
    let ig = mu * kl_after_success(belief) + (1.0 - mu) * kl_after_failure(belief);
    if ig < 0.0 {
        0.0
    } else {
        ig
    }
}

/// KL[p ‖ q] between two Beta distributions, in nats.
///
/// KL = ln B(α_q, β_q) − ln B(α_p, β_p) + (α_p − α_q)ψ(α_p) + (β_p − β_q)ψ(β_p)
///      + (α_q − α_p + β_q − β_p)ψ(α_p + β_p)
pub fn kl_divergence_beta(p: &BetaBelief, q: &BetaBelief) -> f64 {
    let (ap, bp) = (p.alpha(), p.beta());
    let (aq, bq) = (q.alpha(), q.beta());
    ln_beta(aq, bq) - ln_beta(ap, bp)
        + (ap - aq) * digamma(ap)
        + (bp - bq) * digamma(bp)
        + (aq - ap + bq - bp) * digamma(ap + bp)
}
