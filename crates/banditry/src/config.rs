//! Experiment configuration.
//!
//! [`Config`] describes one simulated trajectory plus the stopping rule used
//! to read a decision off it; [`SequentialConfig`] describes one sequential
//! Bayes-factor test. Both follow the same conventions:
//!
//! - presets (`quick`, `balanced`, `thorough`) for common budgets,
//! - builder methods that panic on values outside their domain,
//! - [`Config::validate`] / [`SequentialConfig::validate`] returning a
//!   `Result` for configurations assembled from struct literals.

use banditry_core::constants::{
    DEFAULT_DELTA, DEFAULT_ESTIMATOR_SEED, DEFAULT_HORIZON, DEFAULT_LOG_BF_BOUNDARY,
    DEFAULT_MC_SAMPLES, DEFAULT_SEED, DEFAULT_SEQUENTIAL_PULLS,
};
use banditry_core::{
    BetaBelief, Boundaries, PolicyParams, RewardModel, SequentialSpec, StoppingRule,
    TrajectorySpec,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration of a policy experiment.
///
/// Defaults: true rates 0.6 / 0.45, η = 1, β_p = 3, λ = 0.5, 100 steps,
/// seed 42, 1000 Monte Carlo samples per step and a probability stopping
/// rule with δ = 0.05.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // =========================================================================
    // Environment
    // =========================================================================
    /// True success rates of A and B. Default: 0.6 / 0.45.
    pub true_rates: [f64; 2],

    // =========================================================================
    // Policy
    // =========================================================================
    /// Learning rate, precision and information weight.
    pub params: PolicyParams,

    /// Starting beliefs for A and B. Default: Beta(1, 1) for both.
    pub prior: [BetaBelief; 2],

    // =========================================================================
    // Run
    // =========================================================================
    /// Number of steps to simulate. Default: 100.
    pub horizon: usize,

    /// Seed of the trajectory generator. Default: 42.
    pub seed: u64,

    // =========================================================================
    // Best-option estimation
    // =========================================================================
    /// Monte Carlo samples per step. Default: 1000.
    ///
    /// The estimate's standard error shrinks as 1/√n.
    pub mc_samples: usize,

    /// Seed of the best-option estimator. Default: 12345.
    pub mc_seed: u64,

    // =========================================================================
    // Decision
    // =========================================================================
    /// Rule used to read a winner off the trajectory.
    pub stopping: StoppingRule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            true_rates: [0.6, 0.45],
            params: PolicyParams::default(),
            prior: [BetaBelief::uniform(); 2],
            horizon: DEFAULT_HORIZON,
            seed: DEFAULT_SEED,
            mc_samples: DEFAULT_MC_SAMPLES,
            mc_seed: DEFAULT_ESTIMATOR_SEED,
            stopping: StoppingRule::Probability {
                delta: DEFAULT_DELTA,
            },
        }
    }
}

impl Config {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference configuration. Same as [`Config::default`].
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Short runs with a coarse estimator, for fast iteration:
    /// - 50 steps
    /// - 200 Monte Carlo samples
    pub fn quick() -> Self {
        Self {
            horizon: 50,
            mc_samples: 200,
            ..Default::default()
        }
    }

    /// Long runs with a fine estimator:
    /// - 500 steps
    /// - 5,000 Monte Carlo samples
    /// - δ = 0.01
    pub fn thorough() -> Self {
        Self {
            horizon: 500,
            mc_samples: 5_000,
            stopping: StoppingRule::Probability { delta: 0.01 },
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the true success rates.
    pub fn true_rates(mut self, rate_a: f64, rate_b: f64) -> Self {
        assert!((0.0..=1.0).contains(&rate_a), "rate_a must be in [0, 1]");
        assert!((0.0..=1.0).contains(&rate_b), "rate_b must be in [0, 1]");
        self.true_rates = [rate_a, rate_b];
        self
    }

    /// Set the learning rate η.
    pub fn learning_rate(mut self, eta: f64) -> Self {
        assert!(eta > 0.0 && eta.is_finite(), "learning_rate must be positive");
        self.params.eta = eta;
        self
    }

    /// Set the softmax precision β_p.
    pub fn precision(mut self, precision: f64) -> Self {
        assert!(
            precision > 0.0 && precision.is_finite(),
            "precision must be positive"
        );
        self.params.precision = precision;
        self
    }

    /// Set the information weight λ.
    pub fn info_weight(mut self, weight: f64) -> Self {
        assert!(
            weight >= 0.0 && weight.is_finite(),
            "info_weight must be non-negative"
        );
        self.params.info_weight = weight;
        self
    }

    /// Replace all policy parameters at once.
    pub fn policy(mut self, params: PolicyParams) -> Self {
        self.params = params;
        self
    }

    /// Set the starting beliefs.
    pub fn prior(mut self, a: BetaBelief, b: BetaBelief) -> Self {
        self.prior = [a, b];
        self
    }

    /// Set the number of steps.
    pub fn horizon(mut self, steps: usize) -> Self {
        assert!(steps > 0, "horizon must be positive");
        self.horizon = steps;
        self
    }

    /// Set the trajectory seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the Monte Carlo sample count.
    pub fn mc_samples(mut self, samples: usize) -> Self {
        assert!(samples > 0, "mc_samples must be positive");
        self.mc_samples = samples;
        self
    }

    /// Set the estimator seed.
    pub fn mc_seed(mut self, seed: u64) -> Self {
        self.mc_seed = seed;
        self
    }

    /// Stop once either option's best-option probability exceeds 1 − δ.
    pub fn delta(mut self, delta: f64) -> Self {
        assert!(delta > 0.0 && delta < 1.0, "delta must be in (0, 1)");
        self.stopping = StoppingRule::Probability { delta };
        self
    }

    /// Stop once the log Bayes factor leaves `[−b, +b]`.
    pub fn boundary(mut self, b: f64) -> Self {
        assert!(b > 0.0 && b.is_finite(), "boundary must be positive");
        self.stopping = StoppingRule::Boundary(Boundaries { upper: b, lower: -b });
        self
    }

    /// Stop once the log Bayes factor leaves `[lower, upper]`.
    pub fn boundaries(mut self, lower: f64, upper: f64) -> Self {
        assert!(upper > 0.0 && upper.is_finite(), "upper boundary must be positive");
        assert!(lower < 0.0 && lower.is_finite(), "lower boundary must be negative");
        self.stopping = StoppingRule::Boundary(Boundaries { upper, lower });
        self
    }

    /// Advance the seed by one, for "run it again" workflows.
    pub fn reseed(mut self) -> Self {
        self.seed = self.seed.wrapping_add(1);
        self
    }

    /// Trajectory spec described by this configuration.
    pub fn trajectory_spec(&self) -> TrajectorySpec {
        TrajectorySpec::new(self.true_rates, self.params, self.horizon, self.seed)
            .with_prior(self.prior[0], self.prior[1])
            .with_monte_carlo(self.mc_samples, self.mc_seed)
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// The first core validation error found.
    pub fn validate(&self) -> Result<()> {
        self.trajectory_spec().validate()?;
        self.stopping.validate()?;
        Ok(())
    }
}

/// Configuration of a sequential Bayes-factor test.
///
/// Defaults: binary rewards with rates 0.55 / 0.48, prior Beta(1, 1),
/// boundaries ±ln 19 (≈ ±2.94), 200 pulls, seed 42.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialConfig {
    /// Reward model and its parameters.
    pub model: RewardModel,
    /// Number of pulls. Default: 200.
    pub pulls: usize,
    /// Generator seed. Default: 42.
    pub seed: u64,
    /// Log Bayes factor corridor. Default: ±2.944.
    pub boundaries: Boundaries,
}

impl Default for SequentialConfig {
    fn default() -> Self {
        Self {
            model: RewardModel::binary(0.55, 0.48),
            pulls: DEFAULT_SEQUENTIAL_PULLS,
            seed: DEFAULT_SEED,
            boundaries: Boundaries {
                upper: DEFAULT_LOG_BF_BOUNDARY,
                lower: -DEFAULT_LOG_BF_BOUNDARY,
            },
        }
    }
}

impl SequentialConfig {
    /// Binary test with default settings.
    pub fn binary() -> Self {
        Self::default()
    }

    /// Continuous test with means 0.25 / −0.1 and σ = 1.
    pub fn continuous() -> Self {
        Self {
            model: RewardModel::continuous(0.25, -0.1, 1.0),
            ..Default::default()
        }
    }

    /// Set binary success rates, keeping the prior if the model is already binary.
    pub fn rates(mut self, rate_a: f64, rate_b: f64) -> Self {
        assert!((0.0..=1.0).contains(&rate_a), "rate_a must be in [0, 1]");
        assert!((0.0..=1.0).contains(&rate_b), "rate_b must be in [0, 1]");
        let prior = match self.model {
            RewardModel::Binary { prior, .. } => prior,
            RewardModel::Continuous { .. } => BetaBelief::uniform(),
        };
        self.model = RewardModel::Binary {
            rates: [rate_a, rate_b],
            prior,
        };
        self
    }

    /// Set the Beta prior of a binary test.
    pub fn prior(mut self, alpha: f64, beta: f64) -> Self {
        assert!(alpha > 0.0 && alpha.is_finite(), "prior alpha must be positive");
        assert!(beta > 0.0 && beta.is_finite(), "prior beta must be positive");
        match &mut self.model {
            RewardModel::Binary { prior, .. } => {
                *prior =
                    BetaBelief::new(alpha, beta).expect("prior alpha and beta must be positive");
            }
            RewardModel::Continuous { .. } => {
                panic!("prior only applies to the binary reward model")
            }
        }
        self
    }

    /// Set continuous means, keeping σ if the model is already continuous.
    pub fn means(mut self, mean_a: f64, mean_b: f64) -> Self {
        assert!(mean_a.is_finite(), "mean_a must be finite");
        assert!(mean_b.is_finite(), "mean_b must be finite");
        let noise_sd = match self.model {
            RewardModel::Continuous { noise_sd, .. } => noise_sd,
            RewardModel::Binary { .. } => 1.0,
        };
        self.model = RewardModel::continuous(mean_a, mean_b, noise_sd);
        self
    }

    /// Set the noise standard deviation of a continuous test.
    pub fn noise_sd(mut self, sigma: f64) -> Self {
        assert!(sigma > 0.0 && sigma.is_finite(), "noise_sd must be positive");
        match &mut self.model {
            RewardModel::Continuous { noise_sd, .. } => *noise_sd = sigma,
            RewardModel::Binary { .. } => {
                panic!("noise_sd only applies to the continuous reward model")
            }
        }
        self
    }

    /// Set the number of pulls.
    pub fn pulls(mut self, pulls: usize) -> Self {
        assert!(pulls > 0, "pulls must be positive");
        self.pulls = pulls;
        self
    }

    /// Set the generator seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Use the symmetric corridor `[−b, +b]`.
    pub fn boundary(mut self, b: f64) -> Self {
        assert!(b > 0.0 && b.is_finite(), "boundary must be positive");
        self.boundaries = Boundaries { upper: b, lower: -b };
        self
    }

    /// Use the corridor `[lower, upper]`.
    pub fn boundaries(mut self, lower: f64, upper: f64) -> Self {
        assert!(upper > 0.0 && upper.is_finite(), "upper boundary must be positive");
        assert!(lower < 0.0 && lower.is_finite(), "lower boundary must be negative");
        self.boundaries = Boundaries { upper, lower };
        self
    }

    /// Advance the seed by one.
    pub fn reseed(mut self) -> Self {
        self.seed = self.seed.wrapping_add(1);
        self
    }

    /// Sequential spec described by this configuration.
    pub fn spec(&self) -> SequentialSpec {
        SequentialSpec::new(self.model, self.pulls, self.seed, self.boundaries)
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// The first core validation error found.
    pub fn validate(&self) -> Result<()> {
        self.spec().validate()?;
        Ok(())
    }
}
