//! Seeded simulation of the softmax policy against two true success rates.
//!
//! A trajectory is a pure function of its [`TrajectorySpec`]: the same spec
//! always yields a bit-identical sequence of [`Observation`]s. Each step:
//!
//! 1. Summarize both beliefs (posterior mean, information gain).
//! 2. Compute softmax selection probabilities.
//! 3. Draw u₁ from the generator; pull A if u₁ < π_A, otherwise B.
//! 4. Draw u₂; the reward is a success if u₂ < true rate of the pulled option.
//! 5. Update the pulled option's belief with learning rate η.
//! 6. Recompute summaries; log BF = β_p·[(μ_A − μ_B) + λ·(IG_A − IG_B)].
//! 7. Estimate P(θ_A > θ_B) with the estimator's own seed.
//! 8. Record the observation.
//!
//! Exactly two generator draws (u₁ then u₂) are consumed per step. Playback
//! is done by indexing into the finished trajectory; nothing here is live.

use core::ops::Index;

use serde::{Deserialize, Serialize};

use crate::belief::BetaBelief;
use crate::constants::{DEFAULT_ESTIMATOR_SEED, DEFAULT_MC_SAMPLES};
use crate::error::{Error, Result};
use crate::estimator::prob_a_best;
use crate::policy::{ArmSummary, PolicyParams, SelectionProbabilities};
use crate::rng::SeededGenerator;
use crate::stopping::{EvidencePoint, EvidenceTrace};
use crate::types::Arm;

/// Everything that determines a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySpec {
    /// True success rates of A and B, each in [0, 1].
    pub true_rates: [f64; 2],
    /// Policy parameters.
    pub params: PolicyParams,
    /// Number of steps.
    pub horizon: usize,
    /// Seed of the trajectory generator.
    pub seed: u64,
    /// Prior beliefs for A and B.
    pub prior: [BetaBelief; 2],
    /// Monte Carlo samples per best-option estimate.
    pub mc_samples: usize,
    /// Seed of the best-option estimator, independent of `seed`.
    pub mc_seed: u64,
}

impl TrajectorySpec {
    /// Spec with uniform priors and the default estimator settings.
    pub fn new(true_rates: [f64; 2], params: PolicyParams, horizon: usize, seed: u64) -> Self {
        Self {
            true_rates,
            params,
            horizon,
            seed,
            prior: [BetaBelief::uniform(); 2],
            mc_samples: DEFAULT_MC_SAMPLES,
            mc_seed: DEFAULT_ESTIMATOR_SEED,
        }
    }

    /// Replace the priors.
    pub fn with_prior(mut self, a: BetaBelief, b: BetaBelief) -> Self {
        self.prior = [a, b];
        self
    }

    /// Replace the estimator sample count and seed.
    pub fn with_monte_carlo(mut self, samples: usize, seed: u64) -> Self {
        self.mc_samples = samples;
        self.mc_seed = seed;
        self
    }

    /// Replace the trajectory seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every input domain.
    ///
    /// # Errors
    ///
    /// The first validation failure found: rate, policy, horizon, prior or
    /// sample count.
    pub fn validate(&self) -> Result<()> {
        for (arm, &rate) in [Arm::A, Arm::B].iter().zip(self.true_rates.iter()) {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::InvalidRate { arm: *arm, rate });
            }
        }
        self.params.validate()?;
        if self.horizon == 0 {
            return Err(Error::InvalidHorizon);
        }
        for prior in &self.prior {
            BetaBelief::new(prior.alpha(), prior.beta())?;
        }
        if self.mc_samples == 0 {
            return Err(Error::InvalidSampleCount);
        }
        Ok(())
    }
}

/// Record of one simulated step. All belief quantities are post-update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// 1-based step number.
    pub step: usize,
    /// Option pulled.
    pub arm: Arm,
    /// Whether the pull succeeded.
    pub success: bool,
    /// Posterior mean of A.
    pub mean_a: f64,
    /// Posterior mean of B.
    pub mean_b: f64,
    /// Information gain of A.
    pub info_gain_a: f64,
    /// Information gain of B.
    pub info_gain_b: f64,
    /// Selection probabilities used to choose this step's option.
    pub probabilities: SelectionProbabilities,
    /// Signed log Bayes factor, positive when A is favored.
    pub log_bayes_factor: f64,
    /// Estimated P(θ_A > θ_B).
    pub p_a_best: f64,
    /// Estimated P(θ_B > θ_A), the complement of `p_a_best`.
    pub p_b_best: f64,
    /// Belief about A.
    pub belief_a: BetaBelief,
    /// Belief about B.
    pub belief_b: BetaBelief,
}

impl Observation {
    /// Reward as 0 or 1.
    pub fn reward(&self) -> u8 {
        u8::from(self.success)
    }

    /// Summary of one option's post-update belief.
    pub fn summary(&self, arm: Arm) -> ArmSummary {
        match arm {
            Arm::A => ArmSummary {
                mean: self.mean_a,
                information_gain: self.info_gain_a,
            },
            Arm::B => ArmSummary {
                mean: self.mean_b,
                information_gain: self.info_gain_b,
            },
        }
    }

    /// Selection probabilities the given parameters would assign to the
    /// post-update beliefs of this step.
    ///
    /// Lets a viewer explore other precision and information weights without
    /// re-simulating.
    pub fn policy_under(&self, params: &PolicyParams) -> SelectionProbabilities {
        params.probabilities(&self.summary(Arm::A), &self.summary(Arm::B))
    }
}

/// Finished, immutable sequence of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    spec: TrajectorySpec,
    observations: Vec<Observation>,
}

impl Trajectory {
    /// Spec the trajectory was simulated from.
    pub fn spec(&self) -> &TrajectorySpec {
        &self.spec
    }

    /// All observations in step order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations (equal to the horizon).
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True if there are no observations. Never the case for a simulated trajectory.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observation at 1-based `step`.
    pub fn at_step(&self, step: usize) -> Option<&Observation> {
        step.checked_sub(1).and_then(|i| self.observations.get(i))
    }

    /// Last observation.
    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Iterate over observations.
    pub fn iter(&self) -> core::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Pull counts for A and B.
    pub fn pull_counts(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for obs in &self.observations {
            counts[obs.arm.index()] += 1;
        }
        counts
    }

    /// Total successes across both options.
    pub fn total_reward(&self) -> usize {
        self.observations.iter().filter(|o| o.success).count()
    }
}

impl Index<usize> for Trajectory {
    type Output = Observation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.observations[index]
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Observation;
    type IntoIter = core::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

impl EvidenceTrace for Trajectory {
    fn evidence_len(&self) -> usize {
        self.observations.len()
    }

    fn evidence_at(&self, index: usize) -> EvidencePoint {
        let obs = &self.observations[index];
        EvidencePoint {
            step: obs.step,
            log_bayes_factor: obs.log_bayes_factor,
            p_a_best: Some(obs.p_a_best),
        }
    }
}

/// Simulate a full trajectory.
///
/// # Errors
///
/// Any validation error from [`TrajectorySpec::validate`], or
/// [`Error::NonFinite`] if a step produces NaN or infinity. A failed step
/// discards the whole run; no partial trajectory is returned.
pub fn simulate(spec: &TrajectorySpec) -> Result<Trajectory> {
    spec.validate()?;

    let params = spec.params;
    let mut rng = SeededGenerator::new(spec.seed);
    let mut beliefs = spec.prior;
    let mut observations = Vec::with_capacity(spec.horizon);

    for step in 1..=spec.horizon {
        let summary_a = ArmSummary::of(&beliefs[0]);
        let summary_b = ArmSummary::of(&beliefs[1]);
        let probabilities = params.probabilities(&summary_a, &summary_b);

        let arm = probabilities.choose(rng.next_uniform());
        let success = rng.next_uniform() < spec.true_rates[arm.index()];

        beliefs[arm.index()].update(success, params.eta)?;

        let post_a = ArmSummary::of(&beliefs[0]);
        let post_b = ArmSummary::of(&beliefs[1]);
        let log_bayes_factor = params.log_odds(&post_a, &post_b);
        check_finite(
            step,
            &[
                ("posterior mean", post_a.mean),
                ("posterior mean", post_b.mean),
                ("information gain", post_a.information_gain),
                ("information gain", post_b.information_gain),
                ("log Bayes factor", log_bayes_factor),
            ],
        )?;

        let p_a_best = prob_a_best(&beliefs[0], &beliefs[1], spec.mc_samples, spec.mc_seed)?;
        check_finite(step, &[("best-option probability", p_a_best)])?;

        observations.push(Observation {
            step,
            arm,
            success,
            mean_a: post_a.mean,
            mean_b: post_b.mean,
            info_gain_a: post_a.information_gain,
            info_gain_b: post_b.information_gain,
            probabilities,
            log_bayes_factor,
            p_a_best,
            p_b_best: 1.0 - p_a_best,
            belief_a: beliefs[0],
            belief_b: beliefs[1],
        });
    }

    Ok(Trajectory {
        spec: *spec,
        observations,
    })
}

fn check_finite(step: usize, values: &[(&'static str, f64)]) -> Result<()> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(quantity, _)) => Err(Error::NonFinite { step, quantity }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_spec() -> TrajectorySpec {
        TrajectorySpec::new([0.6, 0.45], PolicyParams::new(1.0, 3.0, 0.5), 100, 42)
    }

    #[test]
    fn test_length_and_step_numbers() {
        let trajectory = simulate(&default_spec()).unwrap();
        assert_eq!(trajectory.len(), 100);
        for (i, obs) in trajectory.iter().enumerate() {
            assert_eq!(obs.step, i + 1);
        }
        assert_eq!(trajectory.at_step(1), Some(&trajectory[0]));
        assert_eq!(trajectory.at_step(0), None);
        assert_eq!(trajectory.at_step(101), None);
    }

    #[test]
    fn test_bit_identical_replay() {
        let first = simulate(&default_spec()).unwrap();
        let second = simulate(&default_spec()).unwrap();
        assert_eq!(first, second);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.log_bayes_factor.to_bits(), b.log_bayes_factor.to_bits());
            assert_eq!(a.p_a_best.to_bits(), b.p_a_best.to_bits());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let first = simulate(&default_spec()).unwrap();
        let second = simulate(&default_spec().with_seed(43)).unwrap();
        assert_ne!(first.observations(), second.observations());
    }

    #[test]
    fn test_beliefs_track_pulls() {
        let trajectory = simulate(&default_spec()).unwrap();
        let last = trajectory.last().unwrap();
        let [pulls_a, pulls_b] = trajectory.pull_counts();
        assert_eq!(pulls_a + pulls_b, 100);
        // With η = 1 and a uniform prior, α + β − 2 counts pulls.
        assert!((last.belief_a.pseudo_count() - 2.0 - pulls_a as f64).abs() < 1e-9);
        assert!((last.belief_b.pseudo_count() - 2.0 - pulls_b as f64).abs() < 1e-9);
        let successes = (last.belief_a.alpha() - 1.0) + (last.belief_b.alpha() - 1.0);
        assert!((successes - trajectory.total_reward() as f64).abs() < 1e-9);
    }

    #[test]
    fn test_only_pulled_option_changes() {
        let trajectory = simulate(&default_spec()).unwrap();
        let mut previous = [BetaBelief::uniform(); 2];
        for obs in &trajectory {
            let current = [obs.belief_a, obs.belief_b];
            let other = obs.arm.other().index();
            assert_eq!(current[other], previous[other]);
            assert_ne!(current[obs.arm.index()], previous[obs.arm.index()]);
            previous = current;
        }
    }

    #[test]
    fn test_log_bayes_factor_formula() {
        let spec = default_spec();
        let trajectory = simulate(&spec).unwrap();
        let p = spec.params;
        for obs in &trajectory {
            let expected = p.precision
                * ((obs.mean_a - obs.mean_b) + p.info_weight * (obs.info_gain_a - obs.info_gain_b));
            assert!((obs.log_bayes_factor - expected).abs() < 1e-12);
            assert!((obs.p_a_best + obs.p_b_best - 1.0).abs() < 1e-12);
            assert!((obs.probabilities.a + obs.probabilities.b - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_first_step_probabilities_even() {
        let trajectory = simulate(&default_spec()).unwrap();
        assert!((trajectory[0].probabilities.a - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_certain_rates() {
        let spec = TrajectorySpec::new([1.0, 0.0], PolicyParams::default(), 50, 7);
        let trajectory = simulate(&spec).unwrap();
        for obs in &trajectory {
            assert_eq!(obs.success, obs.arm == Arm::A);
        }
    }

    #[test]
    fn test_policy_under_other_parameters() {
        let trajectory = simulate(&default_spec()).unwrap();
        let obs = trajectory.last().unwrap();
        let greedy = obs.policy_under(&PolicyParams::greedy(1.0, 3.0));
        let expected = PolicyParams::greedy(1.0, 3.0).probabilities_for(&obs.belief_a, &obs.belief_b);
        assert!((greedy.a - expected.a).abs() < 1e-12);
    }

    #[test]
    fn test_validation_errors() {
        let bad_rate = TrajectorySpec::new([1.2, 0.5], PolicyParams::default(), 10, 1);
        assert!(matches!(
            simulate(&bad_rate),
            Err(Error::InvalidRate { arm: Arm::A, .. })
        ));

        let bad_horizon = TrajectorySpec::new([0.5, 0.5], PolicyParams::default(), 0, 1);
        assert_eq!(simulate(&bad_horizon), Err(Error::InvalidHorizon));

        let bad_policy = TrajectorySpec::new([0.5, 0.5], PolicyParams::new(-1.0, 3.0, 0.5), 10, 1);
        assert!(matches!(simulate(&bad_policy), Err(Error::InvalidPolicy(_))));

        let bad_mc = default_spec().with_monte_carlo(0, 1);
        assert_eq!(simulate(&bad_mc), Err(Error::InvalidSampleCount));
    }

    #[test]
    fn test_estimator_seed_does_not_perturb_pulls() {
        let base = simulate(&default_spec()).unwrap();
        let other = simulate(&default_spec().with_monte_carlo(1000, 999)).unwrap();
        for (a, b) in base.iter().zip(other.iter()) {
            assert_eq!(a.arm, b.arm);
            assert_eq!(a.success, b.success);
            assert_eq!(a.log_bayes_factor, b.log_bayes_factor);
        }
    }

    #[test]
    fn test_non_finite_information_gain_aborts_run() {
        let huge = BetaBelief::new(1e308, 1e308).unwrap();
        let spec = default_spec()
            .with_prior(huge, huge)
            .with_monte_carlo(10, 1);
        assert_eq!(
            simulate(&spec),
            Err(Error::NonFinite {
                step: 1,
                quantity: "information gain"
            })
        );
    }
}
