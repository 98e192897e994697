//! Experiment runners: validate a configuration, simulate, read off a verdict.

use banditry_core::{
    run_sequential_test, simulate, Arm, EvidenceTrace, SequentialOutcome, SequentialRun,
    StoppingRule, Trajectory, Verdict,
};
use serde::{Deserialize, Serialize};

use crate::config::{Config, SequentialConfig};
use crate::error::Result;

/// Horizons below this rarely reach a decision; inconclusive runs this short
/// get a warning.
const SHORT_HORIZON: usize = 50;

/// Runs the softmax policy for a [`Config`].
///
/// ```
/// use banditry::Experiment;
///
/// let report = Experiment::quick().run().unwrap();
/// assert_eq!(report.trajectory().len(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct Experiment {
    config: Config,
}

impl Experiment {
    /// Experiment for an explicit configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Experiment with [`Config::balanced`].
    pub fn balanced() -> Self {
        Self::new(Config::balanced())
    }

    /// Experiment with [`Config::quick`].
    pub fn quick() -> Self {
        Self::new(Config::quick())
    }

    /// Experiment with [`Config::thorough`].
    pub fn thorough() -> Self {
        Self::new(Config::thorough())
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate, simulate and evaluate the stopping rule.
    ///
    /// # Errors
    ///
    /// Any validation error, or [`banditry_core::Error::NonFinite`] if the
    /// run produced a value that cannot be recorded.
    pub fn run(&self) -> Result<Report> {
        self.config.validate()?;
        let spec = self.config.trajectory_spec();
        let trajectory = simulate(&spec)?;
        let verdict = self.config.stopping.evaluate(&trajectory);

        let [pulls_a, pulls_b] = trajectory.pull_counts();
        tracing::debug!(
            seed = spec.seed,
            steps = trajectory.len(),
            pulls_a,
            pulls_b,
            reward = trajectory.total_reward(),
            final_log_bf = trajectory.final_log_bayes_factor(),
            "simulated trajectory"
        );
        log_verdict(&verdict, self.config.horizon);

        Ok(Report {
            config: self.config,
            trajectory,
            verdict,
        })
    }
}

fn log_verdict(verdict: &Verdict, horizon: usize) {
    match verdict {
        Verdict::Winner { arm, step, .. } => {
            tracing::info!("option {} declared best at step {}", arm, step);
        }
        Verdict::Inconclusive { steps, .. } if horizon < SHORT_HORIZON => {
            tracing::warn!(
                "no decision after {} steps; horizon {} may be too short to decide",
                steps,
                horizon
            );
        }
        Verdict::Inconclusive { steps, .. } => {
            tracing::debug!("no decision after {} steps", steps);
        }
    }
}

/// Result of a policy experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    config: Config,
    trajectory: Trajectory,
    verdict: Verdict,
}

impl Report {
    /// Configuration the report was produced from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Full trajectory.
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Stopping verdict.
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Best-option probability of A after the last step.
    pub fn final_p_a_best(&self) -> f64 {
        self.trajectory.last().map_or(0.5, |obs| obs.p_a_best)
    }

    /// Option with the higher final best-option probability, or `None` at exactly 0.5.
    pub fn favored(&self) -> Option<Arm> {
        let p = self.final_p_a_best();
        if p > 0.5 {
            Some(Arm::A)
        } else if p < 0.5 {
            Some(Arm::B)
        } else {
            None
        }
    }

    /// Evaluate a different stopping rule against the same trajectory.
    pub fn verdict_under(&self, rule: &StoppingRule) -> Verdict {
        rule.evaluate(&self.trajectory)
    }

    /// Expected regret: Σ (best true rate − true rate of the pulled option).
    pub fn expected_regret(&self) -> f64 {
        let rates = self.config.true_rates;
        let best = rates[0].max(rates[1]);
        self.trajectory
            .iter()
            .map(|obs| best - rates[obs.arm.index()])
            .sum()
    }
}

/// Runs a sequential Bayes-factor test for a [`SequentialConfig`].
#[derive(Debug, Clone)]
pub struct SequentialExperiment {
    config: SequentialConfig,
}

impl SequentialExperiment {
    /// Experiment for an explicit configuration.
    pub fn new(config: SequentialConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &SequentialConfig {
        &self.config
    }

    /// Validate and run the test.
    ///
    /// # Errors
    ///
    /// Any validation error.
    pub fn run(&self) -> Result<SequentialReport> {
        let spec = self.config.spec();
        let run = run_sequential_test(&spec)?;
        let outcome = *run.outcome();

        match outcome.side {
            Some(side) => tracing::info!(
                model = spec.model.name(),
                "{} boundary crossed at pull {} (log BF {:.3})",
                side,
                outcome.step,
                outcome.final_log_bayes_factor
            ),
            None if spec.pulls < SHORT_HORIZON => tracing::warn!(
                model = spec.model.name(),
                "no boundary crossed in {} pulls; too few pulls to decide",
                spec.pulls
            ),
            None => tracing::debug!(
                model = spec.model.name(),
                "no boundary crossed in {} pulls (log BF {:.3})",
                spec.pulls,
                outcome.final_log_bayes_factor
            ),
        }

        Ok(SequentialReport {
            config: self.config,
            run,
        })
    }
}

/// Result of a sequential test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialReport {
    config: SequentialConfig,
    run: SequentialRun,
}

impl SequentialReport {
    /// Configuration the report was produced from.
    pub fn config(&self) -> &SequentialConfig {
        &self.config
    }

    /// Every pull of the test.
    pub fn run(&self) -> &SequentialRun {
        &self.run
    }

    /// First-crossing outcome.
    pub fn outcome(&self) -> &SequentialOutcome {
        self.run.outcome()
    }
}
