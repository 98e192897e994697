//! Command-line front end.
//!
//! # Usage
//!
//! ```bash
//! # Default run: rates 0.6 / 0.45, 100 steps, seed 42
//! banditry simulate
//!
//! # Greedy policy with a Bayes-factor boundary and a per-step table
//! banditry simulate --info-weight 0 --boundary 3 --steps
//!
//! # 500 seeds of the quick preset
//! banditry sweep --preset quick --runs 500
//!
//! # P(A best) for Beta(8, 4) vs Beta(5, 5)
//! banditry estimate --alpha-a 8 --beta-a 4 --alpha-b 5 --beta-b 5
//!
//! # Continuous sequential test as JSON
//! banditry sequential --model continuous --json
//! ```
//!
//! Set `RUST_LOG=banditry=debug` for per-run diagnostics on stderr.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use banditry_core::constants::{DEFAULT_ESTIMATOR_SEED, DEFAULT_STANDALONE_MC_SAMPLES};
use banditry_core::estimator::{prob_a_best, standard_error};

use banditry::output::{
    format_report, format_sequential_report, format_steps, format_sweep, to_json_pretty,
};
use banditry::{
    sweep, BetaBelief, Boundaries, Config, Experiment, RewardModel, SequentialConfig,
    SequentialExperiment, StoppingRule,
};

/// Bayesian two-option decision simulator
#[derive(Parser, Debug)]
#[command(name = "banditry")]
#[command(about = "Simulate information-seeking policies and sequential Bayes-factor tests")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate one policy trajectory and read a verdict off it
    Simulate {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Print every step
        #[arg(long)]
        steps: bool,

        /// Emit JSON instead of the terminal report
        #[arg(long)]
        json: bool,
    },

    /// Simulate many seeds and summarize the verdicts
    Sweep {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Number of seeds, starting at --seed
        #[arg(long, default_value = "200")]
        runs: u64,

        /// Emit JSON instead of the terminal report
        #[arg(long)]
        json: bool,
    },

    /// Estimate P(A best) for two Beta beliefs
    Estimate {
        /// Alpha of A
        #[arg(long, default_value = "1")]
        alpha_a: f64,

        /// Beta of A
        #[arg(long, default_value = "1")]
        beta_a: f64,

        /// Alpha of B
        #[arg(long, default_value = "1")]
        alpha_b: f64,

        /// Beta of B
        #[arg(long, default_value = "1")]
        beta_b: f64,

        /// Monte Carlo samples
        #[arg(short = 'n', long, default_value_t = DEFAULT_STANDALONE_MC_SAMPLES)]
        samples: usize,

        /// Estimator seed
        #[arg(short, long, default_value_t = DEFAULT_ESTIMATOR_SEED)]
        seed: u64,
    },

    /// Run a sequential Bayes-factor test
    Sequential {
        #[command(flatten)]
        test: SequentialArgs,

        /// Emit JSON instead of the terminal report
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Quick,
    Balanced,
    Thorough,
}

#[derive(clap::Args, Debug)]
struct PolicyArgs {
    /// Preset configuration
    #[arg(short, long, value_enum, default_value = "balanced")]
    preset: Preset,

    /// True success rate of A
    #[arg(long, allow_negative_numbers = true)]
    rate_a: Option<f64>,

    /// True success rate of B
    #[arg(long, allow_negative_numbers = true)]
    rate_b: Option<f64>,

    /// Learning rate (eta)
    #[arg(long, allow_negative_numbers = true)]
    eta: Option<f64>,

    /// Softmax precision (beta)
    #[arg(long, allow_negative_numbers = true)]
    precision: Option<f64>,

    /// Information weight (lambda)
    #[arg(long, allow_negative_numbers = true)]
    info_weight: Option<f64>,

    /// Number of steps
    #[arg(long)]
    horizon: Option<usize>,

    /// Trajectory seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Monte Carlo samples per step
    #[arg(long)]
    mc_samples: Option<usize>,

    /// Probability stopping rule: stop once P(best) > 1 - delta
    #[arg(long, allow_negative_numbers = true, conflicts_with = "boundary")]
    delta: Option<f64>,

    /// Boundary stopping rule: stop once |log BF| >= boundary
    #[arg(long, allow_negative_numbers = true)]
    boundary: Option<f64>,
}

impl PolicyArgs {
    /// Preset with the flags applied, checked before anything runs.
    fn config(&self) -> banditry::Result<Config> {
        let mut config = match self.preset {
            Preset::Quick => Config::quick(),
            Preset::Balanced => Config::balanced(),
            Preset::Thorough => Config::thorough(),
        };
        if let Some(rate) = self.rate_a {
            config.true_rates[0] = rate;
        }
        if let Some(rate) = self.rate_b {
            config.true_rates[1] = rate;
        }
        if let Some(eta) = self.eta {
            config.params.eta = eta;
        }
        if let Some(precision) = self.precision {
            config.params.precision = precision;
        }
        if let Some(weight) = self.info_weight {
            config.params.info_weight = weight;
        }
        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(samples) = self.mc_samples {
            config.mc_samples = samples;
        }
        if let Some(delta) = self.delta {
            config.stopping = StoppingRule::Probability { delta };
        }
        if let Some(b) = self.boundary {
            config.stopping = StoppingRule::Boundary(Boundaries { upper: b, lower: -b });
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Model {
    Binary,
    Continuous,
}

#[derive(clap::Args, Debug)]
struct SequentialArgs {
    /// Reward model
    #[arg(short, long, value_enum, default_value = "binary")]
    model: Model,

    /// Binary success rate (or continuous mean) of A
    #[arg(long, allow_negative_numbers = true)]
    a: Option<f64>,

    /// Binary success rate (or continuous mean) of B
    #[arg(long, allow_negative_numbers = true)]
    b: Option<f64>,

    /// Noise standard deviation (continuous model)
    #[arg(long, allow_negative_numbers = true)]
    sigma: Option<f64>,

    /// Number of pulls
    #[arg(long)]
    pulls: Option<usize>,

    /// Generator seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Symmetric log Bayes factor boundary
    #[arg(long, allow_negative_numbers = true)]
    boundary: Option<f64>,
}

impl SequentialArgs {
    fn config(&self) -> banditry::Result<SequentialConfig> {
        let mut config = match self.model {
            Model::Binary => SequentialConfig::binary(),
            Model::Continuous => SequentialConfig::continuous(),
        };
        match &mut config.model {
            RewardModel::Binary { rates, .. } => {
                if let Some(a) = self.a {
                    rates[0] = a;
                }
                if let Some(b) = self.b {
                    rates[1] = b;
                }
            }
            RewardModel::Continuous { means, noise_sd } => {
                if let Some(a) = self.a {
                    means[0] = a;
                }
                if let Some(b) = self.b {
                    means[1] = b;
                }
                if let Some(sigma) = self.sigma {
                    *noise_sd = sigma;
                }
            }
        }
        if let Some(pulls) = self.pulls {
            config.pulls = pulls;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(b) = self.boundary {
            config.boundaries = Boundaries { upper: b, lower: -b };
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args.command) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> banditry::Result<String> {
    match command {
        Command::Simulate {
            policy,
            steps,
            json,
        } => {
            let report = Experiment::new(policy.config()?).run()?;
            if json {
                return Ok(to_json_pretty(&report)? + "\n");
            }
            let mut output = String::new();
            if steps {
                output.push_str(&format_steps(report.trajectory()));
                output.push('\n');
            }
            output.push_str(&format_report(&report));
            Ok(output)
        }
        Command::Sweep {
            policy,
            runs,
            json,
        } => {
            let config = policy.config()?;
            let seeds: Vec<u64> = (0..runs).map(|i| config.seed.wrapping_add(i)).collect();
            let summary = sweep(&config, &seeds)?;
            if json {
                Ok(to_json_pretty(&summary)? + "\n")
            } else {
                Ok(format_sweep(&summary))
            }
        }
        Command::Estimate {
            alpha_a,
            beta_a,
            alpha_b,
            beta_b,
            samples,
            seed,
        } => {
            let a = BetaBelief::new(alpha_a, beta_a)?;
            let b = BetaBelief::new(alpha_b, beta_b)?;
            let p = prob_a_best(&a, &b, samples, seed)?;
            Ok(format!(
                "P(A best) = {:.4} \u{00B1} {:.4} ({} samples, seed {})\n",
                p,
                standard_error(p, samples),
                samples,
                seed
            ))
        }
        Command::Sequential { test, json } => {
            let report = SequentialExperiment::new(test.config()?).run()?;
            if json {
                Ok(to_json_pretty(&report)? + "\n")
            } else {
                Ok(format_sequential_report(&report))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banditry::Arm;
    use banditry_core::Error as CoreError;

    fn run_args(args: &[&str]) -> banditry::Result<String> {
        let args = Args::try_parse_from(std::iter::once("banditry").chain(args.iter().copied()))
            .expect("arguments should parse");
        run(args.command)
    }

    #[test]
    fn test_invalid_policy_flags_are_errors() {
        assert!(matches!(
            run_args(&["simulate", "--horizon", "0"]),
            Err(banditry::Error::Core(CoreError::InvalidHorizon))
        ));
        assert!(matches!(
            run_args(&["simulate", "--rate-a", "1.5"]),
            Err(banditry::Error::Core(CoreError::InvalidRate { arm: Arm::A, .. }))
        ));
        assert!(matches!(
            run_args(&["simulate", "--eta", "-1"]),
            Err(banditry::Error::Core(CoreError::InvalidPolicy(_)))
        ));
        assert!(matches!(
            run_args(&["sweep", "--mc-samples", "0", "--runs", "2"]),
            Err(banditry::Error::Core(CoreError::InvalidSampleCount))
        ));
        assert!(matches!(
            run_args(&["simulate", "--delta", "1.5"]),
            Err(banditry::Error::Core(CoreError::InvalidThreshold { .. }))
        ));
        assert!(matches!(
            run_args(&["simulate", "--boundary", "-2"]),
            Err(banditry::Error::Core(CoreError::InvalidBoundary { .. }))
        ));
    }

    #[test]
    fn test_invalid_sequential_flags_are_errors() {
        assert!(matches!(
            run_args(&["sequential", "--model", "continuous", "--sigma", "-1"]),
            Err(banditry::Error::Core(CoreError::InvalidNoise { .. }))
        ));
        assert!(matches!(
            run_args(&["sequential", "--a", "1.2"]),
            Err(banditry::Error::Core(CoreError::InvalidRate { arm: Arm::A, .. }))
        ));
        assert!(matches!(
            run_args(&["sequential", "--pulls", "0"]),
            Err(banditry::Error::Core(CoreError::InvalidHorizon))
        ));
    }

    #[test]
    fn test_negative_values_parse() {
        let args = Args::try_parse_from([
            "banditry",
            "sequential",
            "--model",
            "continuous",
            "--a",
            "0.3",
            "--b",
            "-0.5",
        ])
        .unwrap();
        let Command::Sequential { test, .. } = args.command else {
            panic!("expected the sequential subcommand");
        };
        let config = test.config().unwrap();
        assert_eq!(config.model, RewardModel::continuous(0.3, -0.5, 1.0));
    }

    #[test]
    fn test_flags_override_preset() {
        let args = Args::try_parse_from([
            "banditry", "simulate", "-p", "quick", "--rate-b", "0.2", "--boundary", "2.5",
        ])
        .unwrap();
        let Command::Simulate { policy, .. } = args.command else {
            panic!("expected the simulate subcommand");
        };
        let config = policy.config().unwrap();
        assert_eq!(config.true_rates, [Config::quick().true_rates[0], 0.2]);
        assert_eq!(config.horizon, Config::quick().horizon);
        assert_eq!(
            config.stopping,
            StoppingRule::Boundary(Boundaries {
                upper: 2.5,
                lower: -2.5
            })
        );
    }

    #[test]
    fn test_valid_run_produces_output() {
        let output = run_args(&["sequential", "--pulls", "20"]).unwrap();
        assert!(!output.is_empty());
        let output = run_args(&["estimate", "--alpha-a", "8", "--beta-a", "4"]).unwrap();
        assert!(output.starts_with("P(A best) = "));
    }
}
