//! Multi-seed sweeps.
//!
//! Runs the same configuration over many seeds and aggregates the verdicts.
//! Runs share no state, so with the `parallel` feature they are spread over
//! the rayon thread pool; results are identical either way.

use banditry_core::{run_sequential_test, simulate, Arm, Side, Verdict};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{Config, SequentialConfig};
use crate::error::{Error, Result};

/// Per-seed result of a policy sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedResult {
    /// Trajectory seed.
    pub seed: u64,
    /// Stopping verdict.
    pub verdict: Verdict,
    /// Best-option probability of A after the last step.
    pub final_p_a_best: f64,
}

/// Aggregate of a policy sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Per-seed results, in seed order.
    pub results: Vec<SeedResult>,
    /// Runs that declared A.
    pub a_wins: usize,
    /// Runs that declared B.
    pub b_wins: usize,
    /// Runs without a decision.
    pub inconclusive: usize,
    /// Runs whose final P(A best) exceeded 0.5.
    pub a_favored: usize,
    /// Mean stopping step over decided runs, if any decided.
    pub mean_stopping_step: Option<f64>,
}

impl SweepSummary {
    /// Number of runs.
    pub fn runs(&self) -> usize {
        self.results.len()
    }

    /// Fraction of runs whose final P(A best) exceeded 0.5.
    pub fn a_favored_rate(&self) -> f64 {
        self.a_favored as f64 / self.runs() as f64
    }

    /// Fraction of runs that declared `arm`.
    pub fn win_rate(&self, arm: Arm) -> f64 {
        let wins = match arm {
            Arm::A => self.a_wins,
            Arm::B => self.b_wins,
        };
        wins as f64 / self.runs() as f64
    }

    fn from_results(results: Vec<SeedResult>) -> Self {
        let mut a_wins = 0;
        let mut b_wins = 0;
        let mut steps = Vec::new();
        for r in &results {
            match r.verdict {
                Verdict::Winner { arm: Arm::A, step, .. } => {
                    a_wins += 1;
                    steps.push(step);
                }
                Verdict::Winner { arm: Arm::B, step, .. } => {
                    b_wins += 1;
                    steps.push(step);
                }
                Verdict::Inconclusive { .. } => {}
            }
        }
        let a_favored = results.iter().filter(|r| r.final_p_a_best > 0.5).count();
        Self {
            inconclusive: results.len() - a_wins - b_wins,
            a_wins,
            b_wins,
            a_favored,
            mean_stopping_step: mean(&steps),
            results,
        }
    }
}

/// Run `config` once per seed.
///
/// # Errors
///
/// [`Error::EmptySweep`] for no seeds, otherwise the first run error.
pub fn sweep(config: &Config, seeds: &[u64]) -> Result<SweepSummary> {
    if seeds.is_empty() {
        return Err(Error::EmptySweep);
    }
    config.validate()?;

    let run_one = |&seed: &u64| -> Result<SeedResult> {
        let spec = config.trajectory_spec().with_seed(seed);
        let trajectory = simulate(&spec)?;
        Ok(SeedResult {
            seed,
            verdict: config.stopping.evaluate(&trajectory),
            final_p_a_best: trajectory.last().map_or(0.5, |obs| obs.p_a_best),
        })
    };

    #[cfg(feature = "parallel")]
    let results: Result<Vec<SeedResult>> = seeds.par_iter().map(run_one).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Result<Vec<SeedResult>> = seeds.iter().map(run_one).collect();

    let summary = SweepSummary::from_results(results?);
    tracing::info!(
        runs = summary.runs(),
        a_wins = summary.a_wins,
        b_wins = summary.b_wins,
        inconclusive = summary.inconclusive,
        "policy sweep finished"
    );
    Ok(summary)
}

/// Per-seed result of a sequential sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialSeedResult {
    /// Generator seed.
    pub seed: u64,
    /// Boundary crossed first, if any.
    pub side: Option<Side>,
    /// Crossing step, or the number of pulls.
    pub step: usize,
}

/// Aggregate of a sequential sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialSweepSummary {
    /// Per-seed results, in seed order.
    pub results: Vec<SequentialSeedResult>,
    /// Runs that reached the upper boundary.
    pub upper: usize,
    /// Runs that reached the lower boundary.
    pub lower: usize,
    /// Runs that crossed neither.
    pub undecided: usize,
    /// Mean crossing step over runs that crossed, if any did.
    pub mean_crossing_step: Option<f64>,
}

impl SequentialSweepSummary {
    /// Number of runs.
    pub fn runs(&self) -> usize {
        self.results.len()
    }
}

/// Run a sequential test once per seed.
///
/// # Errors
///
/// [`Error::EmptySweep`] for no seeds, otherwise the first run error.
pub fn sequential_sweep(config: &SequentialConfig, seeds: &[u64]) -> Result<SequentialSweepSummary> {
    if seeds.is_empty() {
        return Err(Error::EmptySweep);
    }
    config.validate()?;

    let run_one = |&seed: &u64| -> Result<SequentialSeedResult> {
        let run = run_sequential_test(&config.seed(seed).spec())?;
        let outcome = run.outcome();
        Ok(SequentialSeedResult {
            seed,
            side: outcome.side,
            step: outcome.step,
        })
    };

    #[cfg(feature = "parallel")]
    let results: Result<Vec<SequentialSeedResult>> = seeds.par_iter().map(run_one).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Result<Vec<SequentialSeedResult>> = seeds.iter().map(run_one).collect();

    let results = results?;
    let upper = results.iter().filter(|r| r.side == Some(Side::Upper)).count();
    let lower = results.iter().filter(|r| r.side == Some(Side::Lower)).count();
    let steps: Vec<usize> = results
        .iter()
        .filter(|r| r.side.is_some())
        .map(|r| r.step)
        .collect();

    tracing::info!(
        runs = results.len(),
        upper,
        lower,
        "sequential sweep finished"
    );
    Ok(SequentialSweepSummary {
        undecided: results.len() - upper - lower,
        upper,
        lower,
        mean_crossing_step: mean(&steps),
        results,
    })
}

fn mean(steps: &[usize]) -> Option<f64> {
    if steps.is_empty() {
        None
    } else {
        Some(steps.iter().sum::<usize>() as f64 / steps.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sweep_is_an_error() {
        assert!(matches!(sweep(&Config::quick(), &[]), Err(Error::EmptySweep)));
        assert!(matches!(
            sequential_sweep(&SequentialConfig::default(), &[]),
            Err(Error::EmptySweep)
        ));
    }

    #[test]
    fn test_counts_add_up() {
        let seeds: Vec<u64> = (0..10).collect();
        let summary = sweep(&Config::quick().mc_samples(100), &seeds).unwrap();
        assert_eq!(summary.runs(), 10);
        assert_eq!(summary.a_wins + summary.b_wins + summary.inconclusive, 10);
        assert_eq!(
            summary.results.iter().map(|r| r.seed).collect::<Vec<_>>(),
            seeds
        );
    }

    #[test]
    fn test_sweep_matches_single_runs() {
        let config = Config::quick().mc_samples(100);
        let summary = sweep(&config, &[3, 4]).unwrap();
        for result in &summary.results {
            let trajectory = simulate(&config.seed(result.seed).trajectory_spec()).unwrap();
            assert_eq!(result.verdict, config.stopping.evaluate(&trajectory));
        }
    }

    #[test]
    fn test_sequential_counts_add_up() {
        let seeds: Vec<u64> = (100..120).collect();
        let summary = sequential_sweep(&SequentialConfig::default(), &seeds).unwrap();
        assert_eq!(summary.upper + summary.lower + summary.undecided, 20);
        for r in &summary.results {
            assert!(r.step >= 1 && r.step <= 200);
        }
    }
}
