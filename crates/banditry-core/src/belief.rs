//! Beta-Bernoulli belief state and the tempered update rule.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Beta(α, β) posterior over an option's success rate.
///
/// Invariant: α > 0 and β > 0. The only mutation is [`BetaBelief::update`],
/// which adds a positive learning rate, so neither parameter ever drops
/// below its prior value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaBelief {
    alpha: f64,
    beta: f64,
}

impl BetaBelief {
    /// Create a belief with the given parameters.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBelief`] unless both parameters are positive and finite.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha.is_finite() && beta > 0.0 && beta.is_finite()) {
            return Err(Error::InvalidBelief { alpha, beta });
        }
        Ok(Self { alpha, beta })
    }

    /// Uniform prior Beta(1, 1).
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Pseudo-success parameter α.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Pseudo-failure parameter β.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Posterior mean α / (α + β).
    ///
    /// Evaluated as 1 / (1 + β/α), which stays finite when α + β overflows.
    pub fn mean(&self) -> f64 {
        1.0 / (1.0 + self.beta / self.alpha)
    }

    /// Posterior variance αβ / ((α + β)²(α + β + 1)).
    pub fn variance(&self) -> f64 {
        let total = self.alpha + self.beta;
        self.alpha * self.beta / (total * total * (total + 1.0))
    }

    /// Total pseudo-count α + β.
    pub fn pseudo_count(&self) -> f64 {
        self.alpha + self.beta
    }

    /// Apply one observation with learning rate `eta`.
    ///
    /// A success adds `eta` to α, a failure adds it to β. With `eta = 1` this
    /// is exact conjugate updating; other values temper (η < 1) or sharpen
    /// (η > 1) the per-observation effect.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPolicy`] if `eta` is not positive and finite. The
    /// belief is left untouched in that case.
    pub fn update(&mut self, won: bool, eta: f64) -> Result<()> {
        if !(eta > 0.0 && eta.is_finite()) {
            return Err(Error::InvalidPolicy("learning rate eta must be > 0"));
        }
        if won {
            self.alpha += eta;
        } else {
            self.beta += eta;
        }
        Ok(())
    }

    /// Return a copy updated with one observation.
    pub fn updated(mut self, won: bool, eta: f64) -> Result<Self> {
        self.update(won, eta)?;
        Ok(self)
    }
}

impl Default for BetaBelief {
    fn default() -> Self {
        Self::uniform()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Parameters never fall below the prior, whatever the outcome sequence.
        #[test]
        fn prop_never_below_prior(
            alpha in 0.01f64..50.0,
            beta in 0.01f64..50.0,
            eta in 0.01f64..5.0,
            outcomes in prop::collection::vec(any::<bool>(), 0..100),
        ) {
            let prior = BetaBelief::new(alpha, beta).unwrap();
            let mut belief = prior;
            for won in outcomes {
                belief.update(won, eta).unwrap();
                prop_assert!(belief.alpha() >= prior.alpha());
                prop_assert!(belief.beta() >= prior.beta());
            }
        }

        /// A success strictly raises the mean, a failure strictly lowers it.
        #[test]
        fn prop_posterior_monotone(
            alpha in 0.01f64..1000.0,
            beta in 0.01f64..1000.0,
            eta in 0.01f64..5.0,
        ) {
            let belief = BetaBelief::new(alpha, beta).unwrap();
            prop_assert!(belief.updated(true, eta).unwrap().mean() > belief.mean());
            prop_assert!(belief.updated(false, eta).unwrap().mean() < belief.mean());
        }
    }
}
