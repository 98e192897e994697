//! End-to-end scenarios
//!
//! - `policy`: the reference two-option experiment across many seeds
//! - `sequential`: the reference sequential Bayes-factor tests

#[path = "scenarios/policy.rs"]
mod policy;
#[path = "scenarios/sequential.rs"]
mod sequential;
