//! Gradual warm-up from "Accurate, Large Minibatch SGD: Training ImageNet in 1 Hour".
//!
//! The profile has three phases laid out as a [`SequenceComposer`]:
//!
//! 1. linear ramp from `starts_with` to 1.0 over `warmup_steps`,
//! 2. optional hold at 1.0 for `add_constant_steps`,
//! 3. an open-ended downstream schedule (flat 1.0 when none is given).

use crate::composer::{ScheduleSegment, SequenceComposer};
use crate::curves::{ConstantSchedule, CosineAnnealing, LinearDecay, LinearRamp};
use oxidize_lr_core::{ConfigResult, ConfigurationError, RateSchedule, SegmentLength};
use serde::{Deserialize, Serialize};

/// Construction parameters for a [`WarmUpSchedule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmUpConfig {
    /// Ramp duration in steps. Must be at least 1.
    pub warmup_steps: usize,
    /// Fraction of the base rate at step 0.
    #[serde(default)]
    pub starts_with: f64,
    /// Steps held at 1.0 between the ramp and the downstream schedule.
    #[serde(default)]
    pub add_constant_steps: usize,
    /// Overrides the ramp denominator (defaults to `warmup_steps`).
    ///
    /// A denominator smaller than `warmup_steps` ends the ramp above the
    /// base rate, as in the linear scaling rule `0.1 * kn / 256`.
    #[serde(default)]
    pub warmup_denominator: Option<usize>,
}

impl WarmUpConfig {
    pub fn new(warmup_steps: usize) -> Self {
        WarmUpConfig {
            warmup_steps,
            starts_with: 0.0,
            add_constant_steps: 0,
            warmup_denominator: None,
        }
    }

    pub fn with_starts_with(mut self, starts_with: f64) -> Self {
        self.starts_with = starts_with;
        self
    }

    pub fn with_constant_steps(mut self, add_constant_steps: usize) -> Self {
        self.add_constant_steps = add_constant_steps;
        self
    }

    pub fn with_denominator(mut self, denominator: usize) -> Self {
        self.warmup_denominator = Some(denominator);
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.warmup_steps == 0 {
            return Err(ConfigurationError::InvalidConfig(
                "warmup_steps must be at least 1".into(),
            ));
        }
        // 1.0 is degenerate (flat ramp) but accepted
        if !self.starts_with.is_finite() || !(0.0..=1.0).contains(&self.starts_with) {
            return Err(ConfigurationError::InvalidConfig(format!(
                "starts_with must be in [0.0, 1.0], got {}",
                self.starts_with
            )));
        }
        if self.warmup_denominator == Some(0) {
            return Err(ConfigurationError::InvalidConfig(
                "warmup_denominator must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn check_horizon(&self, num_training_steps: usize) -> ConfigResult<usize> {
        if num_training_steps <= self.warmup_steps {
            return Err(ConfigurationError::TrainingHorizonTooShort {
                warmup_steps: self.warmup_steps,
                num_training_steps,
            });
        }
        Ok(num_training_steps - self.warmup_steps)
    }
}

/// Which phase of the warm-up profile owns the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmUpPhase {
    Ramp,
    Hold,
    AfterWarmUp,
}

/// Ramp, optional hold, then a downstream schedule.
pub struct WarmUpSchedule {
    config: WarmUpConfig,
    composer: SequenceComposer,
}

impl WarmUpSchedule {
    /// Build the profile. `after_warmup` of `None` keeps the rate at its base value.
    pub fn new(
        config: WarmUpConfig,
        after_warmup: Option<Box<dyn RateSchedule>>,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let denominator = config.warmup_denominator.unwrap_or(config.warmup_steps);
        let ramp = LinearRamp::new(denominator).with_starts_with(config.starts_with);

        let mut segments = vec![ScheduleSegment::finite(ramp, config.warmup_steps)];
        if config.add_constant_steps > 0 {
            segments.push(ScheduleSegment::finite(
                ConstantSchedule::new(1.0),
                config.add_constant_steps,
            ));
        }
        let after: Box<dyn RateSchedule> =
            after_warmup.unwrap_or_else(|| Box::new(ConstantSchedule::new(1.0)));
        segments.push(ScheduleSegment::new(after, SegmentLength::Unbounded));

        let composer = SequenceComposer::new(segments)?;
        Ok(WarmUpSchedule { config, composer })
    }

    /// Warm-up followed by cosine annealing to 0.0 at `num_training_steps`.
    pub fn with_cosine_stage(config: WarmUpConfig, num_training_steps: usize) -> ConfigResult<Self> {
        let decay_steps = config.check_horizon(num_training_steps)?;
        Self::new(config, Some(Box::new(CosineAnnealing::new(decay_steps))))
    }

    /// Warm-up followed by linear decay to 0.0 at `num_training_steps`.
    pub fn with_linear_stage(config: WarmUpConfig, num_training_steps: usize) -> ConfigResult<Self> {
        let decay_steps = config.check_horizon(num_training_steps)?;
        Self::new(config, Some(Box::new(LinearDecay::new(decay_steps))))
    }

    pub fn config(&self) -> &WarmUpConfig { &self.config }

    pub fn composer(&self) -> &SequenceComposer { &self.composer }

    pub fn phase(&self) -> WarmUpPhase {
        match self.composer.active_index() {
            0 => WarmUpPhase::Ramp,
            1 if self.config.add_constant_steps > 0 => WarmUpPhase::Hold,
            _ => WarmUpPhase::AfterWarmUp,
        }
    }
}

impl RateSchedule for WarmUpSchedule {
    fn value(&self, step: usize) -> f64 { self.composer.value(step) }
    fn current_step(&self) -> usize { self.composer.current_step() }
    fn set_step(&mut self, step: usize) { self.composer.set_step(step) }
    fn advance(&mut self) { self.composer.advance() }
    fn current_value(&self) -> f64 { self.composer.current_value() }
}
