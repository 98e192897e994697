//! Numerical core for two-option Bayesian sequential decisions.
//!
//! This crate provides the algorithms behind `banditry`, with no logging and
//! no I/O. Every run is a pure function of its inputs and seed:
//!
//! - **Beliefs** ([`belief`]): Beta-Bernoulli posteriors with tempered updates
//! - **Information value** ([`information`]): expected KL divergence of one more pull
//! - **Policy** ([`policy`]): softmax over posterior mean plus information bonus
//! - **Trajectories** ([`trajectory`]): seeded simulation of the policy against true rates
//! - **Best-option estimation** ([`estimator`]): Monte Carlo P(θ_A > θ_B)
//! - **Stopping** ([`stopping`]): probability thresholds and Bayes-factor boundaries
//! - **Sequential testing** ([`sequential`]): shared-rate vs distinct-rate evidence
//!
//! # Usage
//!
//! ```
//! use banditry_core::{
//!     belief::BetaBelief,
//!     policy::PolicyParams,
//!     stopping::{StoppingRule, Verdict},
//!     trajectory::{simulate, TrajectorySpec},
//! };
//!
//! let spec = TrajectorySpec::new([0.6, 0.45], PolicyParams::new(1.0, 3.0, 0.5), 100, 42);
//! let trajectory = simulate(&spec).unwrap();
//! assert_eq!(trajectory.len(), 100);
//!
//! let rule = StoppingRule::probability(0.05).unwrap();
//! match rule.evaluate(&trajectory) {
//!     Verdict::Inconclusive { .. } => {}
//!     Verdict::Winner { arm, step, .. } => println!("{arm} wins at step {step}"),
//! }
//! # let _ = BetaBelief::uniform();
//! ```

pub mod belief;
pub mod constants;
pub mod error;
pub mod estimator;
pub mod information;
pub mod policy;
pub mod rng;
pub mod sampling;
pub mod sequential;
pub mod special;
pub mod stopping;
pub mod trajectory;
pub mod types;

// Re-export commonly used items at crate root
pub use belief::BetaBelief;
pub use error::{Error, Result};
pub use estimator::prob_a_best;
pub use information::information_gain;
pub use policy::{PolicyParams, SelectionProbabilities};
pub use rng::SeededGenerator;
pub use sequential::{
    run_sequential_test, RewardModel, SequentialOutcome, SequentialRun, SequentialSpec,
};
pub use stopping::{Boundaries, EvidenceTrace, StoppingRule, Verdict};
pub use trajectory::{simulate, Observation, Trajectory, TrajectorySpec};
pub use types::{Arm, Side};
