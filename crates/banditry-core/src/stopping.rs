//! Stopping rules over accumulated evidence.
//!
//! Two forms are supported:
//!
//! - **Probability threshold**: stop at the first step where
//!   P(θ_A > θ_B) > 1 − δ (declare A) or P(θ_B > θ_A) > 1 − δ (declare B).
//! - **Log Bayes factor boundaries**: stop at the first step where the
//!   cumulative log Bayes factor reaches the upper boundary (A) or the lower
//!   boundary (B).
//!
//! Running out of steps without a crossing is a valid outcome,
//! [`Verdict::Inconclusive`], never an error. Rules are evaluated against
//! anything implementing [`EvidenceTrace`], which both trajectories and
//! sequential test runs do.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Arm, Side};

/// One step of accumulated evidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvidencePoint {
    /// 1-based step number.
    pub step: usize,
    /// Cumulative signed log Bayes factor at this step.
    pub log_bayes_factor: f64,
    /// Estimated P(θ_A > θ_B), when the source tracks one.
    pub p_a_best: Option<f64>,
}

/// Common read-only view of an evidence sequence.
pub trait EvidenceTrace {
    /// Number of recorded steps.
    fn evidence_len(&self) -> usize;

    /// Evidence at 0-based `index`. Must not be called with `index >= evidence_len()`.
    fn evidence_at(&self, index: usize) -> EvidencePoint;

    /// Iterate over all evidence points in order.
    fn evidence(&self) -> EvidenceIter<'_, Self>
    where
        Self: Sized,
    {
        EvidenceIter {
            trace: self,
            index: 0,
        }
    }

    /// Last recorded log Bayes factor, or 0 for an empty trace.
    fn final_log_bayes_factor(&self) -> f64 {
        match self.evidence_len() {
            0 => 0.0,
            n => self.evidence_at(n - 1).log_bayes_factor,
        }
    }
}

/// Iterator returned by [`EvidenceTrace::evidence`].
#[derive(Debug)]
pub struct EvidenceIter<'a, T> {
    trace: &'a T,
    index: usize,
}

impl<T: EvidenceTrace> Iterator for EvidenceIter<'_, T> {
    type Item = EvidencePoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.trace.evidence_len() {
            return None;
        }
        let point = self.trace.evidence_at(self.index);
        self.index += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.trace.evidence_len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: EvidenceTrace> ExactSizeIterator for EvidenceIter<'_, T> {}

/// Log Bayes factor corridor `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    /// Upper boundary, > 0.
    pub upper: f64,
    /// Lower boundary, < 0.
    pub lower: f64,
}

impl Boundaries {
    /// Symmetric corridor `[−b, +b]`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBoundary`] unless `b` is positive and finite.
    pub fn symmetric(b: f64) -> Result<Self> {
        Self::new(-b, b)
    }

    /// Corridor with independent boundaries.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBoundary`] unless `lower < 0 < upper`, both finite.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !(upper > 0.0 && upper.is_finite() && lower < 0.0 && lower.is_finite()) {
            return Err(Error::InvalidBoundary { lower, upper });
        }
        Ok(Self { upper, lower })
    }

    /// Which side, if any, a log Bayes factor has reached. Boundaries are inclusive.
    pub fn side_of(&self, log_bayes_factor: f64) -> Option<Side> {
        if log_bayes_factor >= self.upper {
            Some(Side::Upper)
        } else if log_bayes_factor <= self.lower {
            Some(Side::Lower)
        } else {
            None
        }
    }

    /// First step at which the trace leaves the open corridor.
    pub fn first_crossing<T: EvidenceTrace>(&self, trace: &T) -> Option<Crossing> {
        trace.evidence().find_map(|point| {
            self.side_of(point.log_bayes_factor).map(|side| Crossing {
                side,
                step: point.step,
                log_bayes_factor: point.log_bayes_factor,
            })
        })
    }
}

/// A boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    /// Boundary reached.
    pub side: Side,
    /// 1-based step of the crossing.
    pub step: usize,
    /// Log Bayes factor at the crossing.
    pub log_bayes_factor: f64,
}

/// Stopping rule configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StoppingRule {
    /// Stop once the best-option probability of either option exceeds 1 − δ.
    Probability {
        /// Error rate δ ∈ (0, 1).
        delta: f64,
    },
    /// Stop once the log Bayes factor leaves the corridor.
    Boundary(Boundaries),
}

impl StoppingRule {
    /// Probability-threshold rule.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidThreshold`] unless 0 < δ < 1.
    pub fn probability(delta: f64) -> Result<Self> {
        if !(delta > 0.0 && delta < 1.0) {
            return Err(Error::InvalidThreshold { delta });
        }
        Ok(Self::Probability { delta })
    }

    /// Symmetric boundary rule `[−b, +b]`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBoundary`] unless b > 0.
    pub fn boundary(b: f64) -> Result<Self> {
        Ok(Self::Boundary(Boundaries::symmetric(b)?))
    }

    /// Re-check the parameters, for rules built from struct literals or deserialized.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Probability { delta } => Self::probability(delta).map(|_| ()),
            Self::Boundary(b) => Boundaries::new(b.lower, b.upper).map(|_| ()),
        }
    }

    /// Evaluate the rule against an evidence trace.
    ///
    /// At most one winner is ever reported: the first qualifying step wins,
    /// and within a step A is checked before B. Traces without best-option
    /// probabilities never satisfy the probability form.
    pub fn evaluate<T: EvidenceTrace>(&self, trace: &T) -> Verdict {
        let hit = match *self {
            Self::Probability { delta } => {
                let threshold = 1.0 - delta;
                trace.evidence().find_map(|point| {
                    let p_a = point.p_a_best?;
                    let arm = if p_a > threshold {
                        Arm::A
                    } else if 1.0 - p_a > threshold {
                        Arm::B
                    } else {
                        return None;
                    };
                    Some((arm, None, point))
                })
            }
            Self::Boundary(boundaries) => trace.evidence().find_map(|point| {
                boundaries.side_of(point.log_bayes_factor).map(|side| {
                    let arm = match side {
                        Side::Upper => Arm::A,
                        Side::Lower => Arm::B,
                    };
                    (arm, Some(side), point)
                })
            }),
        };

        match hit {
            Some((arm, side, point)) => Verdict::Winner {
                arm,
                step: point.step,
                side,
                log_bayes_factor: point.log_bayes_factor,
                p_a_best: point.p_a_best,
            },
            None => Verdict::Inconclusive {
                steps: trace.evidence_len(),
                final_log_bayes_factor: trace.final_log_bayes_factor(),
            },
        }
    }
}

/// Outcome of evaluating a stopping rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// A boundary or threshold was crossed.
    Winner {
        /// Declared best option.
        arm: Arm,
        /// 1-based step of the decision.
        step: usize,
        /// Boundary crossed, for the boundary form.
        side: Option<Side>,
        /// Log Bayes factor at the decision.
        log_bayes_factor: f64,
        /// Best-option probability at the decision, when tracked.
        p_a_best: Option<f64>,
    },
    /// No crossing within the available steps.
    Inconclusive {
        /// Number of steps examined.
        steps: usize,
        /// Log Bayes factor after the last step.
        final_log_bayes_factor: f64,
    },
}

impl Verdict {
    /// Declared winner, if any.
    pub fn winner(&self) -> Option<Arm> {
        match self {
            Verdict::Winner { arm, .. } => Some(*arm),
            Verdict::Inconclusive { .. } => None,
        }
    }

    /// Step at which the run stopped: the decision step, or the trace length.
    pub fn stopping_step(&self) -> usize {
        match self {
            Verdict::Winner { step, .. } => *step,
            Verdict::Inconclusive { steps, .. } => *steps,
        }
    }

    /// True if no decision was reached.
    pub fn is_inconclusive(&self) -> bool {
        matches!(self, Verdict::Inconclusive { .. })
    }
}
