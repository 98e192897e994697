//! Constants used throughout the crate.

/// Default seed for the Monte Carlo best-option estimator.
///
/// Decoupled from any trajectory seed so that every estimate is reproducible
/// on its own.
pub const DEFAULT_ESTIMATOR_SEED: u64 = 12345;

/// Default trajectory seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default Monte Carlo sample count used per trajectory step.
pub const DEFAULT_MC_SAMPLES: usize = 1000;

/// Default Monte Carlo sample count for standalone estimates.
pub const DEFAULT_STANDALONE_MC_SAMPLES: usize = 2000;

/// Default number of steps in a trajectory.
pub const DEFAULT_HORIZON: usize = 100;

/// Default stopping error rate δ: stop once P(best) > 1 − δ.
pub const DEFAULT_DELTA: f64 = 0.05;

/// Default symmetric log Bayes factor boundary, ln(19).
///
/// Corresponds to posterior odds of 19:1, a nominal 5% two-sided error.
pub const DEFAULT_LOG_BF_BOUNDARY: f64 = 2.944_438_979_166_440_5;

/// Default number of pulls for the sequential tester.
pub const DEFAULT_SEQUENTIAL_PULLS: usize = 200;

/// Floor applied to softmax probabilities before taking logarithms.
pub const PROBABILITY_FLOOR: f64 = 1e-12;

/// Floor applied to posterior-predictive probabilities in the binary sequential test.
pub const PREDICTIVE_FLOOR: f64 = 0.001;

/// Scale of the heuristic continuous-reward evidence increment.
pub const CONTINUOUS_EVIDENCE_SCALE: f64 = 0.3;

/// Natural log of 2π.
pub const LOG_2PI: f64 = 1.8378770664093453;
