//! Softmax action selection over exploitation and information value.
//!
//! Each option is scored as `β_p · (μ + λ·IG)`, where μ is the posterior mean
//! and IG the expected information gain of pulling it. Selection
//! probabilities are the softmax of the two scores. With λ = 0 the policy is
//! a plain softmax over posterior means; larger λ leans toward options whose
//! beliefs are less settled, and larger β_p makes the choice greedier.

use serde::{Deserialize, Serialize};

use crate::belief::BetaBelief;
use crate::constants::PROBABILITY_FLOOR;
use crate::error::{Error, Result};
use crate::information::information_gain;
use crate::types::Arm;

/// Parameters of the decision policy, fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyParams {
    /// Learning rate η > 0 applied by the belief update.
    pub eta: f64,
    /// Softmax precision β_p > 0.
    pub precision: f64,
    /// Information weight λ ≥ 0.
    pub info_weight: f64,
}

impl PolicyParams {
    /// Create parameters without validation; see [`PolicyParams::validate`].
    pub const fn new(eta: f64, precision: f64, info_weight: f64) -> Self {
        Self {
            eta,
            precision,
            info_weight,
        }
    }

    /// Pure exploitation: λ = 0.
    pub const fn greedy(eta: f64, precision: f64) -> Self {
        Self::new(eta, precision, 0.0)
    }

    /// Check the parameter domains.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPolicy`] naming the first parameter out of range.
    pub fn validate(&self) -> Result<()> {
        if !(self.eta > 0.0 && self.eta.is_finite()) {
            return Err(Error::InvalidPolicy("learning rate eta must be > 0"));
        }
        if !(self.precision > 0.0 && self.precision.is_finite()) {
            return Err(Error::InvalidPolicy("precision must be > 0"));
        }
        if !(self.info_weight >= 0.0 && self.info_weight.is_finite()) {
            return Err(Error::InvalidPolicy("information weight must be >= 0"));
        }
        Ok(())
    }

    /// Score of one option: β_p · (μ + λ·IG).
    pub fn score(&self, summary: &ArmSummary) -> f64 {
        self.precision * (summary.mean + self.info_weight * summary.information_gain)
    }

    /// Difference of scores, `score_A − score_B`.
    ///
    /// This is the log odds of choosing A over B under the softmax, and the
    /// signed log Bayes factor recorded by trajectories.
    pub fn log_odds(&self, a: &ArmSummary, b: &ArmSummary) -> f64 {
        self.score(a) - self.score(b)
    }

    /// Softmax selection probabilities for the two options.
    pub fn probabilities(&self, a: &ArmSummary, b: &ArmSummary) -> SelectionProbabilities {
        SelectionProbabilities::softmax(self.score(a), self.score(b))
    }

    /// Selection probabilities computed directly from beliefs.
    pub fn probabilities_for(&self, a: &BetaBelief, b: &BetaBelief) -> SelectionProbabilities {
        self.probabilities(&ArmSummary::of(a), &ArmSummary::of(b))
    }
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self::new(1.0, 3.0, 0.5)
    }
}

/// The two policy inputs derived from one belief.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmSummary {
    /// Posterior mean.
    pub mean: f64,
    /// Expected information gain of one more pull.
    pub information_gain: f64,
}

impl ArmSummary {
    /// Summarize a belief.
    pub fn of(belief: &BetaBelief) -> Self {
        Self {
            mean: belief.mean(),
            information_gain: information_gain(belief),
        }
    }
}

/// Probabilities of selecting A and B.
///
/// Both lie in `[1e-12, 1 − 1e-12]` and sum to one, so logarithms of either
/// are always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionProbabilities {
    /// Probability of selecting A.
    pub a: f64,
    /// Probability of selecting B.
    pub b: f64,
}

impl SelectionProbabilities {
    /// Numerically stable two-way softmax.
    ///
    /// The larger score is subtracted before exponentiating.
    pub fn softmax(score_a: f64, score_b: f64) -> Self {
        let max_score = score_a.max(score_b);
        let exp_a = (score_a - max_score).exp();
        let exp_b = (score_b - max_score).exp();
        let a = (exp_a / (exp_a + exp_b)).clamp(PROBABILITY_FLOOR, 1.0 - PROBABILITY_FLOOR);
        Self { a, b: 1.0 - a }
    }

    /// Equal odds.
    pub fn even() -> Self {
        Self { a: 0.5, b: 0.5 }
    }

    /// Probability of selecting `arm`.
    pub fn get(&self, arm: Arm) -> f64 {
        match arm {
            Arm::A => self.a,
            Arm::B => self.b,
        }
    }

    /// Map a uniform draw onto an option: A owns `[0, π_A)`, B owns `[π_A, 1)`.
    pub fn choose(&self, u: f64) -> Arm {
        if u < self.a {
            Arm::A
        } else {
            Arm::B
        }
    }

    /// ln(π_A / π_B).
    pub fn log_ratio(&self) -> f64 {
        self.a.ln() - self.b.ln()
    }
}
