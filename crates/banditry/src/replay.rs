//! Playback cursor over a finished trajectory.
//!
//! A trajectory is simulated once; playback only moves a cursor over it, so
//! stepping forward and backward always shows the same data. The cursor
//! starts before the first step (nothing revealed yet).

use banditry_core::{
    BetaBelief, Observation, PolicyParams, SelectionProbabilities, Trajectory,
};

/// Cursor revealing a trajectory one step at a time.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    trajectory: &'a Trajectory,
    position: usize,
}

impl<'a> Replay<'a> {
    /// Cursor positioned before the first step.
    pub fn new(trajectory: &'a Trajectory) -> Self {
        Self {
            trajectory,
            position: 0,
        }
    }

    /// Number of revealed steps.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total number of steps, revealed or not.
    pub fn total_steps(&self) -> usize {
        self.trajectory.len()
    }

    /// True once every step has been revealed.
    pub fn is_finished(&self) -> bool {
        self.position >= self.trajectory.len()
    }

    /// Most recently revealed observation.
    pub fn current(&self) -> Option<&'a Observation> {
        self.position
            .checked_sub(1)
            .map(|i| &self.trajectory.observations()[i])
    }

    /// Reveal the next step.
    pub fn advance(&mut self) -> Option<&'a Observation> {
        if self.is_finished() {
            return None;
        }
        self.position += 1;
        self.current()
    }

    /// Hide the most recently revealed step.
    pub fn back(&mut self) -> Option<&'a Observation> {
        self.position = self.position.saturating_sub(1);
        self.current()
    }

    /// Jump to `step` revealed steps, clamped to the trajectory length.
    pub fn seek(&mut self, step: usize) -> Option<&'a Observation> {
        self.position = step.min(self.trajectory.len());
        self.current()
    }

    /// Return to the start.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Observations revealed so far.
    pub fn revealed(&self) -> &'a [Observation] {
        &self.trajectory.observations()[..self.position]
    }

    /// Beliefs at the cursor: the prior before any step, otherwise the
    /// post-update beliefs of the current step.
    pub fn beliefs(&self) -> (BetaBelief, BetaBelief) {
        match self.current() {
            Some(obs) => (obs.belief_a, obs.belief_b),
            None => {
                let prior = self.trajectory.spec().prior;
                (prior[0], prior[1])
            }
        }
    }

    /// Selection probabilities `params` would assign at the cursor.
    ///
    /// Used to explore other precision and information weights on recorded
    /// beliefs without re-simulating.
    pub fn live_policy(&self, params: &PolicyParams) -> SelectionProbabilities {
        let (a, b) = self.beliefs();
        params.probabilities_for(&a, &b)
    }
}

impl<'a> Iterator for Replay<'a> {
    type Item = &'a Observation;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.trajectory.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Replay<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use banditry_core::{simulate, TrajectorySpec};

    fn trajectory() -> Trajectory {
        let spec = TrajectorySpec::new([0.6, 0.45], PolicyParams::default(), 20, 42)
            .with_monte_carlo(100, 7);
        simulate(&spec).unwrap()
    }

    #[test]
    fn test_cursor_movement() {
        let t = trajectory();
        let mut replay = Replay::new(&t);
        assert!(replay.current().is_none());
        assert_eq!(replay.advance().map(|o| o.step), Some(1));
        assert_eq!(replay.advance().map(|o| o.step), Some(2));
        assert_eq!(replay.back().map(|o| o.step), Some(1));
        assert!(replay.back().is_none());
        assert!(replay.back().is_none());
        assert_eq!(replay.seek(100).map(|o| o.step), Some(20));
        assert!(replay.is_finished());
        assert!(replay.advance().is_none());
        replay.reset();
        assert_eq!(replay.position(), 0);
    }

    #[test]
    fn test_replay_is_identical_on_every_pass() {
        let t = trajectory();
        let first: Vec<_> = Replay::new(&t).copied().collect();
        let second: Vec<_> = Replay::new(&t).copied().collect();
        assert_eq!(first, second);
        assert_eq!(first.as_slice(), t.observations());
    }

    #[test]
    fn test_live_policy_matches_recorded_summary() {
        let t = trajectory();
        let mut replay = Replay::new(&t);
        let params = PolicyParams::new(1.0, 8.0, 0.0);

        assert_eq!(replay.live_policy(&params), SelectionProbabilities::even());

        let obs = replay.seek(10).unwrap();
        let live = replay.live_policy(&params);
        let recorded = obs.policy_under(&params);
        assert!((live.a - recorded.a).abs() < 1e-12);
        assert_eq!(replay.revealed().len(), 10);
    }

    #[test]
    fn test_exact_size() {
        let t = trajectory();
        let mut replay = Replay::new(&t);
        replay.seek(5);
        assert_eq!(replay.total_steps(), 20);
        assert_eq!(replay.len(), 15);
    }
}
