//! Scenario tests for the sequential Bayes-factor test.

use banditry::{sequential_sweep, SequentialConfig, SequentialExperiment, Side};

#[test]
fn reference_binary_test_is_well_formed() {
    // Rates 0.55 vs 0.48, boundaries ±2.94, 200 pulls.
    let report = SequentialExperiment::new(SequentialConfig::binary())
        .run()
        .unwrap();
    let outcome = report.outcome();
    let bounds = report.config().boundaries;

    assert_eq!(report.run().len(), 200);
    assert!(outcome.step >= 1 && outcome.step <= 200);
    match outcome.side {
        Some(Side::Upper) => assert!(outcome.final_log_bayes_factor >= bounds.upper),
        Some(Side::Lower) => assert!(outcome.final_log_bayes_factor <= bounds.lower),
        None => {
            assert_eq!(outcome.step, 200);
            assert!(report
                .run()
                .log_bayes_factors()
                .all(|lbf| lbf > bounds.lower && lbf < bounds.upper));
        }
    }
}

#[test]
fn crossing_is_the_first_one() {
    for seed in 0..30 {
        let report = SequentialExperiment::new(SequentialConfig::binary().seed(seed))
            .run()
            .unwrap();
        let outcome = report.outcome();
        let bounds = report.config().boundaries;
        let before = &report.run().observations()[..outcome.step - 1];
        assert!(before
            .iter()
            .all(|o| o.log_bayes_factor > bounds.lower && o.log_bayes_factor < bounds.upper));
    }
}

#[test]
fn large_difference_is_detected() {
    let config = SequentialConfig::binary().rates(0.9, 0.1);
    let seeds: Vec<u64> = (0..40).collect();
    let summary = sequential_sweep(&config, &seeds).unwrap();
    assert!(
        summary.upper > 30,
        "upper boundary reached in only {} of 40 runs",
        summary.upper
    );
}

#[test]
fn continuous_test_runs_to_completion() {
    let report = SequentialExperiment::new(SequentialConfig::continuous())
        .run()
        .unwrap();
    assert_eq!(report.run().len(), 200);
    assert!(report.outcome().final_log_bayes_factor.is_finite());
}
