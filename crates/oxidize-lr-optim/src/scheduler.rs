use crate::optimizer::Optimizer;
use oxidize_lr_core::RateSchedule;
use tracing::{trace, warn};

/// Drives an optimizer's rates from a [`RateSchedule`].
///
/// Base rates are captured from the optimizer at construction. Every write
/// sets `lr = base_lr * multiplier` on each group with the same multiplier,
/// so ratios between groups are preserved.
///
/// The optimizer is borrowed mutably only for the duration of a write; call
/// `step` once per optimization step, after the optimizer has consumed the
/// current rate.
pub struct LrScheduler<S: RateSchedule> {
    schedule: S,
    base_lrs: Vec<f64>,
    last_lrs: Vec<f64>,
}

impl<S: RateSchedule> LrScheduler<S> {
    /// Capture base rates and write the step-0 rates.
    pub fn new<O: Optimizer + ?Sized>(schedule: S, optimizer: &mut O) -> Self {
        let base_lrs: Vec<f64> = optimizer.param_groups().iter().map(|g| g.base_lr).collect();
        let mut scheduler = LrScheduler {
            schedule,
            last_lrs: base_lrs.clone(),
            base_lrs,
        };
        scheduler.apply(optimizer);
        scheduler
    }

    /// Advance the schedule one step and write the new rates.
    pub fn step<O: Optimizer + ?Sized>(&mut self, optimizer: &mut O) {
        self.schedule.advance();
        self.apply(optimizer);
    }

    fn apply<O: Optimizer + ?Sized>(&mut self, optimizer: &mut O) {
        let multiplier = self.schedule.current_value();
        let groups = optimizer.param_groups_mut();
        if groups.len() != self.base_lrs.len() {
            warn!(
                expected = self.base_lrs.len(),
                found = groups.len(),
                "optimizer parameter group count changed since scheduler construction"
            );
        }

        self.last_lrs.clear();
        for (group, &base) in groups.iter_mut().zip(&self.base_lrs) {
            group.lr = base * multiplier;
            self.last_lrs.push(group.lr);
        }
        trace!(step = self.schedule.current_step(), multiplier, "applied learning rates");
    }

    pub fn multiplier(&self) -> f64 { self.schedule.current_value() }

    pub fn current_step(&self) -> usize { self.schedule.current_step() }

    pub fn base_lrs(&self) -> &[f64] { &self.base_lrs }

    /// Rates written on the most recent step, one per group actually written.
    pub fn last_lrs(&self) -> &[f64] { &self.last_lrs }

    pub fn schedule(&self) -> &S { &self.schedule }

    pub fn into_schedule(self) -> S { self.schedule }
}
