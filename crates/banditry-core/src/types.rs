//! Common identifiers shared across modules.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One of the two competing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arm {
    /// Option A. Positive log Bayes factors favor A.
    A,
    /// Option B.
    B,
}

impl Arm {
    /// The competing option.
    pub fn other(self) -> Self {
        match self {
            Arm::A => Arm::B,
            Arm::B => Arm::A,
        }
    }

    /// Index into `[A, B]` pairs.
    pub fn index(self) -> usize {
        match self {
            Arm::A => 0,
            Arm::B => 1,
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arm::A => write!(f, "A"),
            Arm::B => write!(f, "B"),
        }
    }
}

/// Which boundary of a log Bayes factor corridor was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The log Bayes factor reached the upper boundary.
    Upper,
    /// The log Bayes factor reached the lower boundary.
    Lower,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Upper => write!(f, "upper"),
            Side::Lower => write!(f, "lower"),
        }
    }
}
