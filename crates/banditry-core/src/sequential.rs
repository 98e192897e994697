//! Sequential Bayes-factor test between a shared-rate and a distinct-rate hypothesis.
//!
//! Independent of the belief/policy machinery: the test keeps its own counts
//! and allocates pulls 50/50 at random. After each pull it adds
//! ln(p(x | H1) / p(x | H0)) to a running log Bayes factor, where H1 gives
//! each option its own rate and H0 pools both options.
//!
//! # Reward models
//!
//! - [`RewardModel::Binary`]: Beta-Bernoulli posterior predictives. For a
//!   success the increment is ln(pred₁ / pred₀); for a failure
//!   ln((1 − pred₁) / (1 − pred₀)). Both predictives are floored at 0.001
//!   before the logarithm. This is a genuine likelihood ratio and is the
//!   reference model.
//! - [`RewardModel::Continuous`]: Gaussian rewards. The increment is
//!   0.3 · (x − pooled)(mean_i − pooled) / σ², which rewards observations that
//!   pull away from the pooled mean in the direction the option already
//!   leans. This is a heuristic score, not a log-likelihood ratio, and its
//!   scale is arbitrary. Treat boundary crossings under it as indicative.
//!
//! Non-finite increments are recorded as zero. The run always spans the
//! configured number of pulls; the outcome reports the first boundary
//! crossing, if any.

use serde::{Deserialize, Serialize};

use crate::belief::BetaBelief;
use crate::constants::{CONTINUOUS_EVIDENCE_SCALE, PREDICTIVE_FLOOR};
use crate::error::{Error, Result};
use crate::rng::SeededGenerator;
use crate::sampling::standard_normal;
use crate::stopping::{Boundaries, EvidencePoint, EvidenceTrace};
use crate::types::{Arm, Side};

/// Reward model and its parameters. Models are exclusive within a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RewardModel {
    /// Bernoulli rewards with a shared Beta prior.
    Binary {
        /// True success rates of A and B, each in [0, 1].
        rates: [f64; 2],
        /// Prior used for both the per-option and the pooled posteriors.
        prior: BetaBelief,
    },
    /// Gaussian rewards with known noise.
    Continuous {
        /// True means of A and B.
        means: [f64; 2],
        /// Noise standard deviation σ > 0.
        noise_sd: f64,
    },
}

impl RewardModel {
    /// Binary model with a uniform prior.
    pub fn binary(rate_a: f64, rate_b: f64) -> Self {
        Self::Binary {
            rates: [rate_a, rate_b],
            prior: BetaBelief::uniform(),
        }
    }

    /// Continuous model.
    pub fn continuous(mean_a: f64, mean_b: f64, noise_sd: f64) -> Self {
        Self::Continuous {
            means: [mean_a, mean_b],
            noise_sd,
        }
    }

    /// Short name, `binary` or `continuous`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Binary { .. } => "binary",
            Self::Continuous { .. } => "continuous",
        }
    }

    /// Check the model parameters.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRate`], [`Error::InvalidBelief`], [`Error::InvalidMean`]
    /// or [`Error::InvalidNoise`].
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Binary { rates, prior } => {
                for (arm, rate) in [(Arm::A, rates[0]), (Arm::B, rates[1])] {
                    if !(0.0..=1.0).contains(&rate) {
                        return Err(Error::InvalidRate { arm, rate });
                    }
                }
                BetaBelief::new(prior.alpha(), prior.beta())?;
            }
            Self::Continuous { means, noise_sd } => {
                for (arm, mean) in [(Arm::A, means[0]), (Arm::B, means[1])] {
                    if !mean.is_finite() {
                        return Err(Error::InvalidMean { arm, mean });
                    }
                }
                if !(noise_sd > 0.0 && noise_sd.is_finite()) {
                    return Err(Error::InvalidNoise { sigma: noise_sd });
                }
            }
        }
        Ok(())
    }
}

/// Everything that determines a sequential test run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialSpec {
    /// Reward model.
    pub model: RewardModel,
    /// Number of pulls to simulate.
    pub pulls: usize,
    /// Seed of the allocation and reward generator.
    pub seed: u64,
    /// Log Bayes factor corridor.
    pub boundaries: Boundaries,
}

impl SequentialSpec {
    /// Create a spec.
    pub fn new(model: RewardModel, pulls: usize, seed: u64, boundaries: Boundaries) -> Self {
        Self {
            model,
            pulls,
            seed,
            boundaries,
        }
    }

    /// Check every input domain.
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        if self.pulls == 0 {
            return Err(Error::InvalidHorizon);
        }
        Boundaries::new(self.boundaries.lower, self.boundaries.upper)?;
        Ok(())
    }
}

/// Per-option counts and the running log Bayes factor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SequentialTestState {
    /// Pulls of A and B.
    pub pulls: [usize; 2],
    /// Successes of A and B (binary model).
    pub successes: [usize; 2],
    /// Reward sums of A and B (continuous model).
    pub sums: [f64; 2],
    /// Cumulative log Bayes factor.
    pub log_bayes_factor: f64,
}

impl SequentialTestState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total pulls across both options.
    pub fn total_pulls(&self) -> usize {
        self.pulls[0] + self.pulls[1]
    }

    /// Empirical success rate of `arm`, if it has been pulled.
    pub fn success_rate(&self, arm: Arm) -> Option<f64> {
        let i = arm.index();
        (self.pulls[i] > 0).then(|| self.successes[i] as f64 / self.pulls[i] as f64)
    }

    /// Empirical reward mean of `arm`, if it has been pulled.
    pub fn mean_reward(&self, arm: Arm) -> Option<f64> {
        let i = arm.index();
        (self.pulls[i] > 0).then(|| self.sums[i] / self.pulls[i] as f64)
    }

    /// Record a binary outcome on `arm` and return the evidence increment.
    ///
    /// Predictives are computed from the counts before this observation.
    pub fn observe_binary(&mut self, arm: Arm, success: bool, prior: &BetaBelief) -> f64 {
        let i = arm.index();
        let (a0, b0) = (prior.alpha(), prior.beta());

        let pred_h1 = (a0 + self.successes[i] as f64) / (a0 + b0 + self.pulls[i] as f64);
        let pooled_successes = (self.successes[0] + self.successes[1]) as f64;
        let pooled_pulls = self.total_pulls() as f64;
        let pred_h0 = (a0 + pooled_successes) / (a0 + b0 + pooled_pulls);

        let increment = if success {
            (pred_h1.max(PREDICTIVE_FLOOR) / pred_h0.max(PREDICTIVE_FLOOR)).ln()
        } else {
            ((1.0 - pred_h1).max(PREDICTIVE_FLOOR) / (1.0 - pred_h0).max(PREDICTIVE_FLOOR)).ln()
        };

        self.pulls[i] += 1;
        self.successes[i] += usize::from(success);
        self.sums[i] += if success { 1.0 } else { 0.0 };
        self.accumulate(increment)
    }

    /// Record a continuous reward on `arm` and return the (heuristic) increment.
    ///
    /// Means are computed after including this observation.
    pub fn observe_continuous(&mut self, arm: Arm, reward: f64, noise_sd: f64) -> f64 {
        let i = arm.index();
        self.pulls[i] += 1;
        self.sums[i] += reward;

        let mean_i = self.sums[i] / self.pulls[i] as f64;
        let pooled = (self.sums[0] + self.sums[1]) / self.total_pulls() as f64;
        let score = (reward - pooled) * (mean_i - pooled) / (noise_sd * noise_sd);
        self.accumulate(CONTINUOUS_EVIDENCE_SCALE * score)
    }

    fn accumulate(&mut self, increment: f64) -> f64 {
        let increment = if increment.is_finite() { increment } else { 0.0 };
        self.log_bayes_factor += increment;
        increment
    }
}

/// One pull of a sequential test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialObservation {
    /// 1-based pull number.
    pub step: usize,
    /// Option pulled.
    pub arm: Arm,
    /// Observed reward: 0 or 1 for the binary model.
    pub reward: f64,
    /// Evidence added by this pull.
    pub increment: f64,
    /// Cumulative log Bayes factor after this pull.
    pub log_bayes_factor: f64,
    /// Counts after this pull.
    pub state: SequentialTestState,
}

/// First-crossing result of a sequential test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialOutcome {
    /// Boundary reached first, or `None` if the pulls ran out.
    ///
    /// Upper favors H1 (the options differ), lower favors H0 (shared rate).
    pub side: Option<Side>,
    /// Crossing step, or the total number of pulls when there was none.
    pub step: usize,
    /// Log Bayes factor at `step`.
    pub final_log_bayes_factor: f64,
    /// Option with the higher empirical rate or mean at `step`; `None` on a tie.
    pub leader: Option<Arm>,
}

impl SequentialOutcome {
    /// True if a boundary was crossed.
    pub fn is_conclusive(&self) -> bool {
        self.side.is_some()
    }

    /// Option named by the crossed boundary: upper is A, lower is B.
    ///
    /// Same mapping as [`StoppingRule::Boundary`](crate::stopping::StoppingRule::Boundary)
    /// applied to the run. `None` if no boundary was crossed.
    pub fn arm(&self) -> Option<Arm> {
        self.side.map(|side| match side {
            Side::Upper => Arm::A,
            Side::Lower => Arm::B,
        })
    }
}

/// Finished sequential test: every pull plus the first-crossing outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialRun {
    spec: SequentialSpec,
    observations: Vec<SequentialObservation>,
    outcome: SequentialOutcome,
}

impl SequentialRun {
    /// Spec the run was simulated from.
    pub fn spec(&self) -> &SequentialSpec {
        &self.spec
    }

    /// Pulls in order.
    pub fn observations(&self) -> &[SequentialObservation] {
        &self.observations
    }

    /// First-crossing outcome.
    pub fn outcome(&self) -> &SequentialOutcome {
        &self.outcome
    }

    /// Number of pulls.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True if there are no pulls. Never the case for a simulated run.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Log Bayes factor after every pull.
    pub fn log_bayes_factors(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.log_bayes_factor)
    }
}

impl EvidenceTrace for SequentialRun {
    fn evidence_len(&self) -> usize {
        self.observations.len()
    }

    fn evidence_at(&self, index: usize) -> EvidencePoint {
        let obs = &self.observations[index];
        EvidencePoint {
            step: obs.step,
            log_bayes_factor: obs.log_bayes_factor,
            p_a_best: None,
        }
    }
}

/// Run a sequential test.
///
/// Per pull the generator supplies one uniform for allocation (A if < 0.5),
/// then one uniform for a binary reward or two (Box-Muller) for a
/// continuous one.
///
/// # Errors
///
/// Any validation error from [`SequentialSpec::validate`].
pub fn run_sequential_test(spec: &SequentialSpec) -> Result<SequentialRun> {
    spec.validate()?;

    let mut rng = SeededGenerator::new(spec.seed);
    let mut state = SequentialTestState::new();
    let mut observations = Vec::with_capacity(spec.pulls);

    for step in 1..=spec.pulls {
        let arm = if rng.next_uniform() < 0.5 { Arm::A } else { Arm::B };
        let (reward, increment) = match spec.model {
            RewardModel::Binary { rates, prior } => {
                let success = rng.next_uniform() < rates[arm.index()];
                let increment = state.observe_binary(arm, success, &prior);
                (if success { 1.0 } else { 0.0 }, increment)
            }
            RewardModel::Continuous { means, noise_sd } => {
                let reward = means[arm.index()] + noise_sd * standard_normal(&mut rng);
                (reward, state.observe_continuous(arm, reward, noise_sd))
            }
        };
        observations.push(SequentialObservation {
            step,
            arm,
            reward,
            increment,
            log_bayes_factor: state.log_bayes_factor,
            state,
        });
    }

    let outcome = first_crossing_outcome(&observations, &spec.boundaries);
    Ok(SequentialRun {
        spec: *spec,
        observations,
        outcome,
    })
}

fn first_crossing_outcome(
    observations: &[SequentialObservation],
    boundaries: &Boundaries,
) -> SequentialOutcome {
    let crossing = observations
        .iter()
        .find_map(|o| boundaries.side_of(o.log_bayes_factor).map(|side| (side, o)));
    let (side, obs) = match crossing {
        Some((side, obs)) => (Some(side), obs),
        None => match observations.last() {
            Some(obs) => (None, obs),
            None => {
                return SequentialOutcome {
                    side: None,
                    step: 0,
                    final_log_bayes_factor: 0.0,
                    leader: None,
                }
            }
        },
    };
    SequentialOutcome {
        side,
        step: obs.step,
        final_log_bayes_factor: obs.log_bayes_factor,
        leader: empirical_leader(&obs.state),
    }
}

fn empirical_leader(state: &SequentialTestState) -> Option<Arm> {
    let a = state.mean_reward(Arm::A)?;
    let b = state.mean_reward(Arm::B)?;
    if a > b {
        Some(Arm::A)
    } else if b > a {
        Some(Arm::B)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_LOG_BF_BOUNDARY;

    fn binary_spec(seed: u64) -> SequentialSpec {
        SequentialSpec::new(
            RewardModel::binary(0.55, 0.48),
            200,
            seed,
            Boundaries::symmetric(DEFAULT_LOG_BF_BOUNDARY).unwrap(),
        )
    }

    #[test]
    fn test_binary_run_is_well_formed() {
        let run = run_sequential_test(&binary_spec(42)).unwrap();
        assert_eq!(run.len(), 200);
        let outcome = run.outcome();
        assert!(outcome.step >= 1 && outcome.step <= 200);
        assert!(outcome.final_log_bayes_factor.is_finite());
        match outcome.side {
            Some(Side::Upper) => assert!(outcome.final_log_bayes_factor >= DEFAULT_LOG_BF_BOUNDARY),
            Some(Side::Lower) => assert!(outcome.final_log_bayes_factor <= -DEFAULT_LOG_BF_BOUNDARY),
            None => {
                assert_eq!(outcome.step, 200);
                assert!(run
                    .log_bayes_factors()
                    .all(|lbf| lbf.abs() < DEFAULT_LOG_BF_BOUNDARY));
            }
        }
    }

    #[test]
    fn test_counts_are_consistent() {
        let run = run_sequential_test(&binary_spec(7)).unwrap();
        let last = run.observations().last().unwrap().state;
        assert_eq!(last.total_pulls(), 200);
        let successes: usize = run.observations().iter().filter(|o| o.reward == 1.0).count();
        assert_eq!(last.successes[0] + last.successes[1], successes);
        let mut sum = 0.0;
        for obs in run.observations() {
            sum += obs.increment;
            assert!((obs.log_bayes_factor - sum).abs() < 1e-9);
        }
    }

    #[test]
    fn test_reproducible() {
        let a = run_sequential_test(&binary_spec(3)).unwrap();
        let b = run_sequential_test(&binary_spec(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_first_binary_increment_is_zero() {
        // With no prior data both hypotheses predict the prior mean.
        let mut state = SequentialTestState::new();
        let increment = state.observe_binary(Arm::A, true, &BetaBelief::uniform());
        assert!(increment.abs() < 1e-12);
        assert_eq!(state.pulls, [1, 0]);
        assert_eq!(state.successes, [1, 0]);
    }

    #[test]
    fn test_binary_increment_values() {
        let prior = BetaBelief::uniform();
        let mut state = SequentialTestState::new();
        state.observe_binary(Arm::A, true, &prior);
        state.observe_binary(Arm::A, true, &prior);
        state.observe_binary(Arm::B, false, &prior);
        // A: 2/2 successes, B: 0/1. Next success on A.
        // H1: (1 + 2) / (2 + 2) = 0.75; H0: (1 + 2) / (2 + 3) = 0.6
        let before = state.log_bayes_factor;
        let inc = state.observe_binary(Arm::A, true, &prior);
        assert!((inc - (0.75_f64 / 0.6).ln()).abs() < 1e-12);
        assert!((state.log_bayes_factor - before - inc).abs() < 1e-12);
    }

    #[test]
    fn test_diverging_rates_push_upward() {
        let spec = SequentialSpec::new(
            RewardModel::binary(0.95, 0.05),
            300,
            11,
            Boundaries::symmetric(DEFAULT_LOG_BF_BOUNDARY).unwrap(),
        );
        let run = run_sequential_test(&spec).unwrap();
        assert_eq!(run.outcome().side, Some(Side::Upper));
        assert_eq!(run.outcome().arm(), Some(Arm::A));
        assert_eq!(run.outcome().leader, Some(Arm::A));
    }

    #[test]
    fn test_outcome_arm_follows_side() {
        let outcome = |side| SequentialOutcome {
            side,
            step: 10,
            final_log_bayes_factor: 0.0,
            leader: Some(Arm::B),
        };
        assert_eq!(outcome(Some(Side::Upper)).arm(), Some(Arm::A));
        assert_eq!(outcome(Some(Side::Lower)).arm(), Some(Arm::B));
        assert_eq!(outcome(None).arm(), None);
        assert!(!outcome(None).is_conclusive());
    }

    #[test]
    fn test_continuous_run() {
        let spec = SequentialSpec::new(
            RewardModel::continuous(0.25, -0.1, 1.0),
            200,
            42,
            Boundaries::symmetric(DEFAULT_LOG_BF_BOUNDARY).unwrap(),
        );
        let run = run_sequential_test(&spec).unwrap();
        assert_eq!(run.len(), 200);
        assert!(run.observations().iter().all(|o| o.increment.is_finite()));
        let state = run.observations().last().unwrap().state;
        assert_eq!(state.successes, [0, 0]);
        assert_eq!(state.total_pulls(), 200);
    }

    #[test]
    fn test_continuous_increment_formula() {
        let mut state = SequentialTestState::new();
        state.observe_continuous(Arm::A, 1.0, 2.0);
        let inc = state.observe_continuous(Arm::B, -1.0, 2.0);
        // pooled = 0, mean_B = -1: 0.3 * (-1)(-1) / 4
        assert!((inc - 0.075).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_increment_treated_as_zero() {
        let mut state = SequentialTestState::new();
        let inc = state.observe_continuous(Arm::A, f64::INFINITY, 1.0);
        assert_eq!(inc, 0.0);
        assert_eq!(state.log_bayes_factor, 0.0);
    }

    #[test]
    fn test_validation() {
        let bounds = Boundaries::symmetric(1.0).unwrap();
        let bad_noise = SequentialSpec::new(RewardModel::continuous(0.0, 0.0, 0.0), 10, 1, bounds);
        assert_eq!(
            run_sequential_test(&bad_noise),
            Err(Error::InvalidNoise { sigma: 0.0 })
        );

        let bad_rate = SequentialSpec::new(RewardModel::binary(0.5, -0.1), 10, 1, bounds);
        assert!(matches!(
            run_sequential_test(&bad_rate),
            Err(Error::InvalidRate { arm: Arm::B, .. })
        ));

        let bad_pulls = SequentialSpec::new(RewardModel::binary(0.5, 0.5), 0, 1, bounds);
        assert_eq!(run_sequential_test(&bad_pulls), Err(Error::InvalidHorizon));

        let bad_mean = SequentialSpec::new(RewardModel::continuous(f64::NAN, 0.0, 1.0), 10, 1, bounds);
        assert!(matches!(
            run_sequential_test(&bad_mean),
            Err(Error::InvalidMean { arm: Arm::A, .. })
        ));
    }

    #[test]
    fn test_boundary_stopping_rule_agrees_with_outcome() {
        use crate::stopping::{StoppingRule, Verdict};

        let spec = binary_spec(5);
        let run = run_sequential_test(&spec).unwrap();
        let verdict = StoppingRule::Boundary(spec.boundaries).evaluate(&run);
        match (verdict, run.outcome().side) {
            (Verdict::Winner { arm, step, side, .. }, Some(outcome_side)) => {
                assert_eq!(step, run.outcome().step);
                assert_eq!(side, Some(outcome_side));
                assert_eq!(Some(arm), run.outcome().arm());
            }
            (Verdict::Inconclusive { steps, .. }, None) => assert_eq!(steps, 200),
            (v, s) => panic!("verdict {:?} disagrees with outcome side {:?}", v, s),
        }
    }
}
