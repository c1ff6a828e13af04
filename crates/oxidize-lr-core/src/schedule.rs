use serde::{Deserialize, Serialize};

/// A learning-rate schedule: maps a step counter to a multiplier of the base rate.
///
/// Implementors only store their step counter and define `value`; `advance`,
/// `reset` and `current_value` are derived from those.
///
/// `value` must be defined for every step. What a schedule does past its
/// nominal horizon (hold, floor, keep following its formula) is up to the
/// schedule and is documented on each implementation.
pub trait RateSchedule {
    /// Multiplier at `step`. Pure: does not look at or touch the counter.
    fn value(&self, step: usize) -> f64;

    /// Current value of the internal step counter.
    fn current_step(&self) -> usize;

    /// Overwrite the internal step counter.
    fn set_step(&mut self, step: usize);

    /// Move the counter forward by one step.
    fn advance(&mut self) {
        let next = self.current_step() + 1;
        self.set_step(next);
    }

    /// Re-base the counter to zero, as if training started now.
    fn reset(&mut self) {
        self.set_step(0);
    }

    /// Multiplier at the current step.
    fn current_value(&self) -> f64 {
        self.value(self.current_step())
    }
}

impl<S: RateSchedule + ?Sized> RateSchedule for Box<S> {
    fn value(&self, step: usize) -> f64 {
        (**self).value(step)
    }

    fn current_step(&self) -> usize {
        (**self).current_step()
    }

    fn set_step(&mut self, step: usize) {
        (**self).set_step(step)
    }

    fn advance(&mut self) {
        (**self).advance()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn current_value(&self) -> f64 {
        (**self).current_value()
    }
}

/// How many global steps a segment stays active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentLength {
    /// Active for exactly `n` steps. `Finite(0)` is skipped.
    Finite(usize),
    /// Active for every remaining step. Only valid on the last segment.
    Unbounded,
}

impl SegmentLength {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, SegmentLength::Unbounded)
    }

    /// Step count for finite segments, `None` for unbounded ones.
    pub fn steps(&self) -> Option<usize> {
        match self {
            SegmentLength::Finite(n) => Some(*n),
            SegmentLength::Unbounded => None,
        }
    }
}

impl From<Option<usize>> for SegmentLength {
    fn from(steps: Option<usize>) -> Self {
        match steps {
            Some(n) => SegmentLength::Finite(n),
            None => SegmentLength::Unbounded,
        }
    }
}
