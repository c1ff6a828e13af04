//! Built-in rate curves.
//!
//! Every curve returns a multiplier of the base learning rate and keeps its
//! own step counter. Denominators are floored at 1 so no configuration can
//! divide by zero.

use oxidize_lr_core::RateSchedule;
use std::f64::consts::PI;
use std::fmt;

fn floored(n: usize) -> f64 {
    (n as f64).max(1.0)
}

/// Fixed multiplier for every step.
#[derive(Debug, Clone)]
pub struct ConstantSchedule {
    pub multiplier: f64,
    pub current_step: usize,
}

impl ConstantSchedule {
    pub fn new(multiplier: f64) -> Self {
        ConstantSchedule { multiplier, current_step: 0 }
    }
}

impl Default for ConstantSchedule {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RateSchedule for ConstantSchedule {
    fn value(&self, _step: usize) -> f64 { self.multiplier }
    fn current_step(&self) -> usize { self.current_step }
    fn set_step(&mut self, step: usize) { self.current_step = step; }
}

/// Multiplier given by an arbitrary closure of the step.
///
/// Past any horizon the closure itself decides what happens.
pub struct LambdaSchedule<F: Fn(usize) -> f64> {
    pub lambda: F,
    pub current_step: usize,
}

impl<F: Fn(usize) -> f64> LambdaSchedule<F> {
    pub fn new(lambda: F) -> Self {
        LambdaSchedule { lambda, current_step: 0 }
    }
}

impl<F: Fn(usize) -> f64> fmt::Debug for LambdaSchedule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdaSchedule")
            .field("current_step", &self.current_step)
            .finish_non_exhaustive()
    }
}

impl<F: Fn(usize) -> f64> RateSchedule for LambdaSchedule<F> {
    fn value(&self, step: usize) -> f64 { (self.lambda)(step) }
    fn current_step(&self) -> usize { self.current_step }
    fn set_step(&mut self, step: usize) { self.current_step = step; }
}

/// Linear warm-up ramp from `starts_with` to 1.0.
///
/// multiplier = starts_with + (1 - starts_with) * step / denominator
///
/// The ramp keeps climbing past `denominator`; wrap it in a finite segment to
/// stop it there.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    pub starts_with: f64,
    pub denominator: usize,
    pub current_step: usize,
}

impl LinearRamp {
    pub fn new(denominator: usize) -> Self {
        LinearRamp { starts_with: 0.0, denominator, current_step: 0 }
    }

    pub fn with_starts_with(mut self, starts_with: f64) -> Self {
        self.starts_with = starts_with;
        self
    }
}

impl RateSchedule for LinearRamp {
    fn value(&self, step: usize) -> f64 {
        self.starts_with + (1.0 - self.starts_with) * (step as f64 / floored(self.denominator))
    }
    fn current_step(&self) -> usize { self.current_step }
    fn set_step(&mut self, step: usize) { self.current_step = step; }
}

/// Cosine annealing from 1.0 down to `min_multiplier` over `t_max` steps.
///
/// multiplier = min + 0.5 * (1 - min) * (1 + cos(π * step / t_max))
///
/// Holds `min_multiplier` once `step >= t_max`.
#[derive(Debug, Clone)]
pub struct CosineAnnealing {
    pub t_max: usize,
    pub min_multiplier: f64,
    pub current_step: usize,
}

impl CosineAnnealing {
    pub fn new(t_max: usize) -> Self {
        CosineAnnealing { t_max, min_multiplier: 0.0, current_step: 0 }
    }

    pub fn with_min_multiplier(mut self, min_multiplier: f64) -> Self {
        self.min_multiplier = min_multiplier;
        self
    }
}

impl RateSchedule for CosineAnnealing {
    fn value(&self, step: usize) -> f64 {
        if step >= self.t_max {
            return self.min_multiplier;
        }
        let progress = step as f64 / floored(self.t_max);
        self.min_multiplier + 0.5 * (1.0 - self.min_multiplier) * (1.0 + (PI * progress).cos())
    }
    fn current_step(&self) -> usize { self.current_step }
    fn set_step(&mut self, step: usize) { self.current_step = step; }
}

/// Linear decay from 1.0 to 0.0 over `total_steps`, floored at 0.0.
#[derive(Debug, Clone)]
pub struct LinearDecay {
    pub total_steps: usize,
    pub current_step: usize,
}

impl LinearDecay {
    pub fn new(total_steps: usize) -> Self {
        LinearDecay { total_steps, current_step: 0 }
    }
}

impl RateSchedule for LinearDecay {
    fn value(&self, step: usize) -> f64 {
        (1.0 - step as f64 / floored(self.total_steps)).max(0.0)
    }
    fn current_step(&self) -> usize { self.current_step }
    fn set_step(&mut self, step: usize) { self.current_step = step; }
}

/// Step decay: multiply by `gamma` every `step_size` steps.
///
/// Follows its formula indefinitely.
#[derive(Debug, Clone)]
pub struct StepDecay {
    pub step_size: usize,
    pub gamma: f64,
    pub current_step: usize,
}

impl StepDecay {
    pub fn new(step_size: usize, gamma: f64) -> Self {
        StepDecay { step_size, gamma, current_step: 0 }
    }
}

impl RateSchedule for StepDecay {
    fn value(&self, step: usize) -> f64 {
        let drops = step / self.step_size.max(1);
        self.gamma.powf(drops as f64)
    }
    fn current_step(&self) -> usize { self.current_step }
    fn set_step(&mut self, step: usize) { self.current_step = step; }
}

/// Exponential decay: multiplier = gamma^step. Follows its formula indefinitely.
#[derive(Debug, Clone)]
pub struct ExponentialDecay {
    pub gamma: f64,
    pub current_step: usize,
}

impl ExponentialDecay {
    pub fn new(gamma: f64) -> Self {
        ExponentialDecay { gamma, current_step: 0 }
    }
}

impl RateSchedule for ExponentialDecay {
    fn value(&self, step: usize) -> f64 {
        self.gamma.powf(step as f64)
    }
    fn current_step(&self) -> usize { self.current_step }
    fn set_step(&mut self, step: usize) { self.current_step = step; }
}
