use oxidize_lr_core::{ConfigResult, ConfigurationError, RateSchedule, SegmentLength};
use tracing::debug;

/// One schedule in a sequence together with how long it stays active.
pub struct ScheduleSegment {
    pub schedule: Box<dyn RateSchedule>,
    pub length: SegmentLength,
}

impl ScheduleSegment {
    pub fn new(schedule: Box<dyn RateSchedule>, length: SegmentLength) -> Self {
        ScheduleSegment { schedule, length }
    }

    /// Segment active for exactly `steps` global steps.
    pub fn finite<S: RateSchedule + 'static>(schedule: S, steps: usize) -> Self {
        Self::new(Box::new(schedule), SegmentLength::Finite(steps))
    }

    /// Final segment, active for every remaining step.
    pub fn unbounded<S: RateSchedule + 'static>(schedule: S) -> Self {
        Self::new(Box::new(schedule), SegmentLength::Unbounded)
    }
}

/// Chains schedules end-to-end, each active for a fixed number of steps.
///
/// Every sub-schedule is re-based on hand-off: it sees its own counter start
/// at zero on its first active step, regardless of how many global steps came
/// before it. Zero-length segments are skipped and never sampled.
///
/// When every segment is finite and the global step runs past their total,
/// the composer holds the value of the last valid step.
///
/// `advance` must be called once per optimization step, in order.
pub struct SequenceComposer {
    segments: Vec<ScheduleSegment>,
    starts: Vec<usize>,
    global_step: usize,
    active: usize,
}

impl SequenceComposer {
    pub fn new(mut segments: Vec<ScheduleSegment>) -> ConfigResult<Self> {
        if segments.is_empty() {
            return Err(ConfigurationError::EmptySchedule);
        }

        let unbounded: Vec<usize> = segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.length.is_unbounded())
            .map(|(i, _)| i)
            .collect();
        if unbounded.len() > 1 {
            return Err(ConfigurationError::MultipleUnbounded { count: unbounded.len() });
        }
        if let Some(&index) = unbounded.first() {
            if index != segments.len() - 1 {
                return Err(ConfigurationError::UnboundedNotLast { index, len: segments.len() });
            }
        }

        let active = segments
            .iter()
            .position(|s| s.length != SegmentLength::Finite(0))
            .ok_or(ConfigurationError::NoActiveSegment)?;

        let mut starts = Vec::with_capacity(segments.len());
        let mut offset = 0usize;
        for seg in &segments {
            starts.push(offset);
            offset = offset
                .checked_add(seg.length.steps().unwrap_or(0))
                .ok_or_else(|| {
                    ConfigurationError::InvalidConfig("total segment length overflows usize".into())
                })?;
        }

        segments[active].schedule.reset();

        Ok(SequenceComposer { segments, starts, global_step: 0, active })
    }

    /// Build from parallel lists of schedules and step counts.
    ///
    /// With one step count fewer than schedules, the last schedule is
    /// unbounded. With equal counts, every segment is finite.
    pub fn from_pairs(
        schedules: Vec<Box<dyn RateSchedule>>,
        steps: Vec<usize>,
    ) -> ConfigResult<Self> {
        let n = schedules.len();
        if n == 0 {
            return Err(ConfigurationError::EmptySchedule);
        }
        if steps.len() != n && steps.len() != n - 1 {
            return Err(ConfigurationError::StepCountMismatch {
                schedules: n,
                expected: format!("{} or {}", n - 1, n),
                steps: steps.len(),
            });
        }

        let mut lengths = steps.into_iter().map(SegmentLength::Finite);
        let segments = schedules
            .into_iter()
            .map(|schedule| {
                let length = lengths.next().unwrap_or(SegmentLength::Unbounded);
                ScheduleSegment::new(schedule, length)
            })
            .collect();
        Self::new(segments)
    }

    pub fn len(&self) -> usize { self.segments.len() }

    pub fn is_empty(&self) -> bool { self.segments.is_empty() }

    pub fn global_step(&self) -> usize { self.global_step }

    /// Index of the segment that owns the current global step.
    pub fn active_index(&self) -> usize { self.active }

    pub fn active_schedule(&self) -> &dyn RateSchedule {
        self.segments[self.active].schedule.as_ref()
    }

    /// Total configured length, or `None` when the last segment is unbounded.
    pub fn total_steps(&self) -> Option<usize> {
        let last = self.segments.len() - 1;
        self.segments[last].length.steps().map(|n| self.starts[last] + n)
    }

    /// True once every finite segment has been used up.
    pub fn is_exhausted(&self) -> bool {
        self.total_steps().map_or(false, |total| self.global_step >= total)
    }

    /// Segment index and segment-local step for a global step.
    ///
    /// Past the end of a fully finite sequence this returns the last valid
    /// step of the last non-empty segment.
    ///
    /// `start + n` cannot overflow: every prefix sum was checked in `new`.
    fn locate(&self, step: usize) -> (usize, usize) {
        let mut last_valid = (0, 0);
        for (i, seg) in self.segments.iter().enumerate() {
            let start = self.starts[i];
            match seg.length {
                SegmentLength::Unbounded => return (i, step - start),
                SegmentLength::Finite(0) => {}
                SegmentLength::Finite(n) => {
                    if step < start + n {
                        return (i, step - start);
                    }
                    last_valid = (i, n - 1);
                }
            }
        }
        last_valid
    }
}

impl RateSchedule for SequenceComposer {
    fn value(&self, step: usize) -> f64 {
        let (index, local) = self.locate(step);
        self.segments[index].schedule.value(local)
    }

    fn current_step(&self) -> usize { self.global_step }

    /// Jump to `step`, re-basing the segment that owns it.
    fn set_step(&mut self, step: usize) {
        let (index, local) = self.locate(step);
        self.global_step = step;
        self.active = index;
        self.segments[index].schedule.set_step(local);
    }

    fn advance(&mut self) {
        self.global_step += 1;
        let (index, local) = self.locate(self.global_step);

        if index != self.active {
            debug!(
                global_step = self.global_step,
                from = self.active,
                to = index,
                "handing off to next schedule segment"
            );
            self.active = index;
            self.segments[index].schedule.reset();
        } else if self.segments[index].schedule.current_step() != local {
            self.segments[index].schedule.advance();
        }
    }

    fn current_value(&self) -> f64 {
        self.segments[self.active].schedule.current_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{ConstantSchedule, CosineAnnealing, LinearDecay, LinearRamp};
    use approx::assert_abs_diff_eq;

    fn boxed<S: RateSchedule + 'static>(schedule: S) -> Box<dyn RateSchedule> {
        Box::new(schedule)
    }

    fn run_to(composer: &mut SequenceComposer, step: usize) {
        while composer.global_step() < step {
            composer.advance();
        }
    }

    #[test]
    fn test_boundary_exactness() {
        let mut composer = SequenceComposer::new(vec![
            ScheduleSegment::finite(ConstantSchedule::new(0.0), 5),
            ScheduleSegment::finite(ConstantSchedule::new(1.0), 3),
            ScheduleSegment::unbounded(ConstantSchedule::new(2.0)),
        ])
        .unwrap();

        let expected = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0];
        for (step, &want) in expected.iter().enumerate() {
            run_to(&mut composer, step);
            assert_eq!(composer.current_value(), want, "step {}", step);
            assert_eq!(composer.value(step), want, "pure value at step {}", step);
        }

        composer.set_step(4);
        assert_eq!(composer.active_index(), 0);
        assert_eq!(composer.current_value(), 0.0);
        composer.advance();
        assert_eq!(composer.global_step(), 5);
        assert_eq!(composer.active_index(), 1);
        assert_eq!(composer.active_schedule().current_step(), 0);
        assert_eq!(composer.current_value(), 1.0);
    }

    #[test]
    fn test_overflowing_lengths_are_rejected() {
        let err = SequenceComposer::new(vec![
            ScheduleSegment::finite(ConstantSchedule::new(1.0), usize::MAX),
            ScheduleSegment::finite(ConstantSchedule::new(0.5), 5),
        ])
        .err();
        assert!(matches!(err, Some(ConfigurationError::InvalidConfig(_))));

        let err = SequenceComposer::from_pairs(
            vec![boxed(ConstantSchedule::new(1.0)), boxed(ConstantSchedule::new(0.5))],
            vec![usize::MAX, 1],
        )
        .err();
        assert!(matches!(err, Some(ConfigurationError::InvalidConfig(_))));
    }

    #[test]
    fn test_huge_finite_prefix_with_unbounded_tail() {
        let composer = SequenceComposer::new(vec![
            ScheduleSegment::finite(ConstantSchedule::new(1.0), usize::MAX - 1),
            ScheduleSegment::unbounded(ConstantSchedule::new(0.5)),
        ])
        .unwrap();
        assert_eq!(composer.total_steps(), None);
        assert_eq!(composer.value(0), 1.0);
        assert_eq!(composer.value(usize::MAX - 2), 1.0);
        assert_eq!(composer.value(usize::MAX - 1), 0.5);
    }

    #[test]
    fn test_rebasing_starts_each_segment_at_zero() {
        let decay = LinearDecay::new(10);
        let isolated_first = decay.value(0);

        let mut composer = SequenceComposer::new(vec![
            ScheduleSegment::finite(LinearRamp::new(7), 7),
            ScheduleSegment::unbounded(decay),
        ])
        .unwrap();

        run_to(&mut composer, 7);
        assert_eq!(composer.active_schedule().current_step(), 0);
        assert_eq!(composer.current_value(), isolated_first);

        run_to(&mut composer, 9);
        assert_eq!(composer.active_schedule().current_step(), 2);
        assert_abs_diff_eq!(composer.current_value(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_rebasing_resets_a_preadvanced_schedule() {
        let mut cosine = CosineAnnealing::new(20);
        for _ in 0..13 { cosine.advance(); }

        let mut composer = SequenceComposer::new(vec![
            ScheduleSegment::finite(ConstantSchedule::new(0.5), 3),
            ScheduleSegment::unbounded(cosine),
        ])
        .unwrap();

        run_to(&mut composer, 3);
        assert_abs_diff_eq!(composer.current_value(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tail_clamping() {
        let mut composer = SequenceComposer::new(vec![
            ScheduleSegment::finite(LinearRamp::new(3), 3),
            ScheduleSegment::finite(LinearDecay::new(4), 2),
        ])
        .unwrap();
        assert_eq!(composer.total_steps(), Some(5));

        run_to(&mut composer, 4);
        let last = composer.current_value();
        assert_abs_diff_eq!(last, 0.75);
        assert!(!composer.is_exhausted());

        for step in 5..50 {
            composer.advance();
            assert!(composer.is_exhausted());
            assert_eq!(composer.current_value(), last, "drift at step {}", step);
            assert_eq!(composer.value(step), last);
        }
    }

    #[test]
    fn test_zero_length_segments_are_never_sampled() {
        let mut composer = SequenceComposer::new(vec![
            ScheduleSegment::finite(ConstantSchedule::new(5.0), 0),
            ScheduleSegment::finite(ConstantSchedule::new(1.0), 2),
            ScheduleSegment::finite(ConstantSchedule::new(9.0), 0),
            ScheduleSegment::unbounded(ConstantSchedule::new(3.0)),
        ])
        .unwrap();

        assert_eq!(composer.active_index(), 1);
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(composer.current_value());
            composer.advance();
        }
        assert_eq!(seen, vec![1.0, 1.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_trailing_zero_length_segment_holds_previous() {
        let mut composer = SequenceComposer::new(vec![
            ScheduleSegment::finite(LinearRamp::new(4), 4),
            ScheduleSegment::finite(ConstantSchedule::new(9.0), 0),
        ])
        .unwrap();
        run_to(&mut composer, 10);
        assert_abs_diff_eq!(composer.current_value(), 0.75);
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            SequenceComposer::new(vec![]).err(),
            Some(ConfigurationError::EmptySchedule)
        );

        let err = SequenceComposer::new(vec![
            ScheduleSegment::unbounded(ConstantSchedule::default()),
            ScheduleSegment::unbounded(ConstantSchedule::default()),
        ])
        .err();
        assert_eq!(err, Some(ConfigurationError::MultipleUnbounded { count: 2 }));

        let err = SequenceComposer::new(vec![
            ScheduleSegment::unbounded(ConstantSchedule::default()),
            ScheduleSegment::finite(ConstantSchedule::default(), 3),
        ])
        .err();
        assert_eq!(err, Some(ConfigurationError::UnboundedNotLast { index: 0, len: 2 }));

        let err = SequenceComposer::new(vec![
            ScheduleSegment::finite(ConstantSchedule::default(), 0),
        ])
        .err();
        assert_eq!(err, Some(ConfigurationError::NoActiveSegment));
    }

    #[test]
    fn test_from_pairs() {
        let composer = SequenceComposer::from_pairs(
            vec![boxed(LinearRamp::new(4)), boxed(ConstantSchedule::new(0.3))],
            vec![4],
        )
        .unwrap();
        assert_eq!(composer.total_steps(), None);
        assert_eq!(composer.value(100), 0.3);

        let composer = SequenceComposer::from_pairs(
            vec![boxed(LinearRamp::new(4)), boxed(ConstantSchedule::new(0.3))],
            vec![4, 2],
        )
        .unwrap();
        assert_eq!(composer.total_steps(), Some(6));

        let err = SequenceComposer::from_pairs(
            vec![boxed(LinearRamp::new(4)), boxed(ConstantSchedule::new(0.3))],
            vec![4, 2, 1],
        )
        .err();
        assert!(matches!(err, Some(ConfigurationError::StepCountMismatch { schedules: 2, steps: 3, .. })));

        assert_eq!(
            SequenceComposer::from_pairs(vec![], vec![]).err(),
            Some(ConfigurationError::EmptySchedule)
        );
    }

    #[test]
    fn test_nested_composers() {
        let inner = SequenceComposer::new(vec![
            ScheduleSegment::finite(ConstantSchedule::new(0.5), 2),
            ScheduleSegment::unbounded(ConstantSchedule::new(0.25)),
        ])
        .unwrap();
        let mut outer = SequenceComposer::new(vec![
            ScheduleSegment::finite(ConstantSchedule::new(1.0), 3),
            ScheduleSegment::unbounded(inner),
        ])
        .unwrap();

        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(outer.current_value());
            outer.advance();
        }
        assert_eq!(seen, vec![1.0, 1.0, 1.0, 0.5, 0.5, 0.25, 0.25]);
    }

    #[test]
    fn test_set_step_jumps_and_rebases() {
        let mut composer = SequenceComposer::new(vec![
            ScheduleSegment::finite(ConstantSchedule::new(1.0), 5),
            ScheduleSegment::unbounded(LinearDecay::new(10)),
        ])
        .unwrap();
        composer.set_step(8);
        assert_eq!(composer.active_index(), 1);
        assert_eq!(composer.active_schedule().current_step(), 3);
        assert_abs_diff_eq!(composer.current_value(), 0.7, epsilon = 1e-12);

        composer.reset();
        assert_eq!(composer.global_step(), 0);
        assert_eq!(composer.current_value(), 1.0);
    }
}
