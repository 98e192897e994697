//! Terminal output formatting with colors and box drawing.

use banditry_core::{Arm, Observation, RewardModel, Side, StoppingRule, Trajectory, Verdict};
use colored::Colorize;

use crate::experiment::{Report, SequentialReport};
use crate::sweep::SweepSummary;

/// Format a policy experiment for the terminal.
pub fn format_report(report: &Report) -> String {
    let config = report.config();
    let trajectory = report.trajectory();
    let mut output = String::new();

    output.push_str(&format_box_top());
    output.push_str(&format_box_line(&format_verdict_header(report.verdict())));
    output.push_str(&format_box_separator());

    output.push_str(&format_box_line(&format!(
        "True rates:  A = {:.3}, B = {:.3}",
        config.true_rates[0], config.true_rates[1]
    )));
    output.push_str(&format_box_line(&format!(
        "Policy:      \u{03B7} = {}, \u{03B2} = {}, \u{03BB} = {}",
        config.params.eta, config.params.precision, config.params.info_weight
    )));
    output.push_str(&format_box_line(&format!(
        "Stopping:    {}",
        format_stopping_rule(&config.stopping)
    )));
    output.push_str(&format_box_line(&format!(
        "Steps:       {} (seed {})",
        trajectory.len(),
        config.seed
    )));
    output.push_str(&format_box_separator());

    let [pulls_a, pulls_b] = trajectory.pull_counts();
    output.push_str(&format_box_line(&format!(
        "Pulls:       A = {}, B = {}",
        pulls_a, pulls_b
    )));
    output.push_str(&format_box_line(&format!(
        "Reward:      {} successes",
        trajectory.total_reward()
    )));
    output.push_str(&format_box_line(&format!(
        "Regret:      {:.2} (expected)",
        report.expected_regret()
    )));

    if let Some(last) = trajectory.last() {
        output.push_str(&format_box_line(&format!(
            "Posterior:   \u{03BC}A = {:.3}, \u{03BC}B = {:.3}",
            last.mean_a, last.mean_b
        )));
        output.push_str(&format_box_line(&format_probability(last.p_a_best)));
        output.push_str(&format_box_line(&format!(
            "Log BF:      {:+.3}",
            last.log_bayes_factor
        )));
    }

    output.push_str(&format_box_bottom());
    output
}

/// Per-step table of a trajectory.
pub fn format_steps(trajectory: &Trajectory) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:>3}  {:>6}  {:>6}  {:>6}  {:>6}  {:>8}  {:>7}\n",
        "step", "arm", "reward", "\u{03BC}A", "\u{03BC}B", "\u{03C0}A", "log BF", "P(A)"
    ));
    for obs in trajectory {
        output.push_str(&format_step(obs));
    }
    output
}

fn format_step(obs: &Observation) -> String {
    let arm = match obs.arm {
        Arm::A => "A".cyan().to_string(),
        Arm::B => "B".magenta().to_string(),
    };
    format!(
        "{:>5}  {:>3}  {:>6}  {:>6.3}  {:>6.3}  {:>6.3}  {:>+8.3}  {:>7.3}\n",
        obs.step,
        arm,
        obs.reward(),
        obs.mean_a,
        obs.mean_b,
        obs.probabilities.a,
        obs.log_bayes_factor,
        obs.p_a_best
    )
}

/// Format a sequential test for the terminal.
pub fn format_sequential_report(report: &SequentialReport) -> String {
    let config = report.config();
    let outcome = report.outcome();
    let mut output = String::new();

    let header = match outcome.side {
        Some(Side::Upper) => format!(
            "{} {}",
            "\u{2713}".green().bold(),
            "OPTIONS DIFFER".green().bold()
        ),
        Some(Side::Lower) => format!(
            "{} {}",
            "\u{2713}".green().bold(),
            "NO DIFFERENCE".green().bold()
        ),
        None => format!("{} {}", "?".yellow().bold(), "UNDECIDED".yellow().bold()),
    };

    output.push_str(&format_box_top());
    output.push_str(&format_box_line(&header));
    output.push_str(&format_box_separator());

    let model = match config.model {
        RewardModel::Binary { rates, prior } => format!(
            "binary, rates {:.3} / {:.3}, prior Beta({}, {})",
            rates[0],
            rates[1],
            prior.alpha(),
            prior.beta()
        ),
        RewardModel::Continuous { means, noise_sd } => format!(
            "continuous, means {:.3} / {:.3}, \u{03C3} = {}",
            means[0], means[1], noise_sd
        ),
    };
    output.push_str(&format_box_line(&format!("Model:       {}", model)));
    output.push_str(&format_box_line(&format!(
        "Boundaries:  [{:.3}, {:.3}]",
        config.boundaries.lower, config.boundaries.upper
    )));
    output.push_str(&format_box_line(&format!(
        "Pulls:       {} (seed {})",
        config.pulls, config.seed
    )));
    output.push_str(&format_box_separator());

    let step_label = if outcome.is_conclusive() {
        "Crossed at"
    } else {
        "Stopped at"
    };
    output.push_str(&format_box_line(&format!(
        "{}:  pull {}",
        step_label, outcome.step
    )));
    output.push_str(&format_box_line(&format!(
        "Log BF:      {:+.3}",
        outcome.final_log_bayes_factor
    )));
    let leader = outcome
        .leader
        .map_or_else(|| "tie".to_string(), |arm| arm.to_string());
    output.push_str(&format_box_line(&format!("Leader:      {}", leader)));

    output.push_str(&format_box_bottom());

    if matches!(config.model, RewardModel::Continuous { .. }) {
        output.push_str(&format!(
            "\n{}\n",
            "Note: the continuous evidence score is a heuristic, not a likelihood ratio."
                .dimmed()
                .italic()
        ));
    }
    output
}

/// Format a sweep summary for the terminal.
pub fn format_sweep(summary: &SweepSummary) -> String {
    let mut output = String::new();
    let runs = summary.runs();

    output.push_str(&format_box_top());
    output.push_str(&format_box_line(&format!(
        "{} {} runs",
        "Sweep:".bold(),
        runs
    )));
    output.push_str(&format_box_separator());
    output.push_str(&format_box_line(&format!(
        "A declared:      {} ({:.1}%)",
        summary.a_wins,
        summary.win_rate(Arm::A) * 100.0
    )));
    output.push_str(&format_box_line(&format!(
        "B declared:      {} ({:.1}%)",
        summary.b_wins,
        summary.win_rate(Arm::B) * 100.0
    )));
    output.push_str(&format_box_line(&format!(
        "Inconclusive:    {}",
        summary.inconclusive
    )));
    output.push_str(&format_box_line(&format!(
        "A favored:       {:.1}% of runs",
        summary.a_favored_rate() * 100.0
    )));
    if let Some(mean) = summary.mean_stopping_step {
        output.push_str(&format_box_line(&format!("Mean stop step:  {:.1}", mean)));
    }
    output.push_str(&format_box_bottom());
    output
}

fn format_verdict_header(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Winner { arm, step, .. } => format!(
            "{} {}",
            "\u{2713}".green().bold(),
            format!("OPTION {} IS BEST (step {})", arm, step).green().bold()
        ),
        Verdict::Inconclusive { steps, .. } => format!(
            "{} {}",
            "?".yellow().bold(),
            format!("INCONCLUSIVE after {} steps", steps).yellow().bold()
        ),
    }
}

fn format_stopping_rule(rule: &StoppingRule) -> String {
    match rule {
        StoppingRule::Probability { delta } => format!("P(best) > {}", 1.0 - delta),
        StoppingRule::Boundary(b) => format!("log BF outside [{:.3}, {:.3}]", b.lower, b.upper),
    }
}

fn format_probability(p_a_best: f64) -> String {
    let text = format!("P(A best):   {:.1}%", p_a_best * 100.0);
    if p_a_best > 0.95 || p_a_best < 0.05 {
        text.green().to_string()
    } else if p_a_best > 0.8 || p_a_best < 0.2 {
        text.yellow().to_string()
    } else {
        text
    }
}

// Box drawing helpers

const BOX_WIDTH: usize = 60;

fn format_box_top() -> String {
    format!("\u{250C}{}\u{2510}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_bottom() -> String {
    format!("\u{2514}{}\u{2518}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_separator() -> String {
    format!("\u{251C}{}\u{2524}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_line(content: &str) -> String {
    let visible_len = strip_ansi_codes(content).chars().count();
    let padding = (BOX_WIDTH - 2).saturating_sub(visible_len);
    format!("\u{2502} {}{} \u{2502}\n", content, " ".repeat(padding))
}

/// Strip ANSI escape codes for length calculation.
fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SequentialConfig};
    use crate::experiment::{Experiment, SequentialExperiment};
    use crate::sweep::sweep;

    #[test]
    fn test_format_report() {
        colored::control::set_override(false);
        let report = Experiment::new(Config::quick().horizon(20).mc_samples(50))
            .run()
            .unwrap();
        let output = format_report(&report);
        assert!(output.contains("True rates:  A = 0.600, B = 0.450"));
        assert!(output.contains("Steps:       20 (seed 42)"));
        assert!(output.contains("P(A best):"));
        match report.verdict() {
            Verdict::Winner { .. } => assert!(output.contains("IS BEST")),
            Verdict::Inconclusive { .. } => assert!(output.contains("INCONCLUSIVE")),
        }
    }

    #[test]
    fn test_format_steps_has_one_row_per_step() {
        colored::control::set_override(false);
        let report = Experiment::new(Config::quick().horizon(12).mc_samples(20))
            .run()
            .unwrap();
        let table = format_steps(report.trajectory());
        assert_eq!(table.lines().count(), 13);
    }

    #[test]
    fn test_format_continuous_sequential_has_note() {
        colored::control::set_override(false);
        let report = SequentialExperiment::new(SequentialConfig::continuous())
            .run()
            .unwrap();
        let output = format_sequential_report(&report);
        assert!(output.contains("continuous, means 0.250 / -0.100"));
        assert!(output.contains("heuristic"));
    }

    #[test]
    fn test_format_sweep() {
        colored::control::set_override(false);
        let summary = sweep(&Config::quick().mc_samples(20), &[1, 2, 3]).unwrap();
        let output = format_sweep(&summary);
        assert!(output.contains("3 runs"));
        assert!(output.contains("Inconclusive:"));
    }

    #[test]
    fn test_box_lines_have_equal_width() {
        let line = format_box_line(&"colored".red().to_string());
        let plain = format_box_line("colored");
        assert_eq!(
            strip_ansi_codes(&line).chars().count(),
            plain.chars().count()
        );
    }

    #[test]
    fn test_strip_ansi_codes() {
        assert_eq!(strip_ansi_codes("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_ansi_codes("plain"), "plain");
    }
}
