//! # banditry
//!
//! Simulate and evaluate Bayesian decisions between two options.
//!
//! An information-seeking softmax policy pulls A or B, updates Beta beliefs
//! about each option's success rate, and records the evidence after every
//! step: posterior means, information gains, a signed log Bayes factor and
//! a Monte Carlo estimate of P(θ_A > θ_B). A stopping rule reads the first
//! decisive step off the recorded evidence. A separate sequential
//! Bayes-factor test asks whether the two options differ at all.
//!
//! Every run is a pure function of its configuration and seed.
//!
//! ## Quick Start
//!
//! ```
//! use banditry::{Config, Experiment, Verdict};
//!
//! let config = Config::balanced().true_rates(0.6, 0.45).seed(7);
//! let report = Experiment::new(config).run().unwrap();
//!
//! match report.verdict() {
//!     Verdict::Winner { arm, step, .. } => println!("{arm} is best at step {step}"),
//!     Verdict::Inconclusive { steps, .. } => println!("undecided after {steps} steps"),
//! }
//! ```
//!
//! ## Sequential testing
//!
//! ```
//! use banditry::{SequentialConfig, SequentialExperiment};
//!
//! let report = SequentialExperiment::new(SequentialConfig::binary()).run().unwrap();
//! println!("{:?} at pull {}", report.outcome().side, report.outcome().step);
//! ```
//!
//! The numerical engine lives in [`banditry_core`]; this crate adds
//! configuration presets, logging through `tracing`, playback, multi-seed
//! sweeps and report formatting.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod experiment;

pub mod output;
pub mod replay;
pub mod sweep;

pub use config::{Config, SequentialConfig};
pub use error::{Error, Result};
pub use experiment::{Experiment, Report, SequentialExperiment, SequentialReport};
pub use replay::Replay;
pub use sweep::{sequential_sweep, sweep, SequentialSweepSummary, SweepSummary};

pub use banditry_core::{
    Arm, BetaBelief, Boundaries, EvidenceTrace, Observation, PolicyParams, RewardModel,
    SelectionProbabilities, SequentialOutcome, SequentialRun, Side, StoppingRule, Trajectory,
    Verdict,
};
