use crate::composer::{ScheduleSegment, SequenceComposer};
use crate::curves::{
    ConstantSchedule, CosineAnnealing, ExponentialDecay, LinearDecay, LinearRamp, StepDecay,
};
use crate::warmup::{WarmUpConfig, WarmUpSchedule};
use oxidize_lr_core::{ConfigResult, ConfigurationError, RateSchedule, SegmentLength};
use serde::{Deserialize, Serialize};

fn one() -> f64 {
    1.0
}

fn unbounded() -> SegmentLength {
    SegmentLength::Unbounded
}

/// Serializable description of a built-in curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveConfig {
    Constant {
        #[serde(default = "one")]
        multiplier: f64,
    },
    LinearRamp {
        denominator: usize,
        #[serde(default)]
        starts_with: f64,
    },
    Cosine {
        t_max: usize,
        #[serde(default)]
        min_multiplier: f64,
    },
    LinearDecay {
        total_steps: usize,
    },
    StepDecay {
        step_size: usize,
        gamma: f64,
    },
    Exponential {
        gamma: f64,
    },
}

impl CurveConfig {
    pub fn build(&self) -> Box<dyn RateSchedule> {
        match *self {
            CurveConfig::Constant { multiplier } => Box::new(ConstantSchedule::new(multiplier)),
            CurveConfig::LinearRamp { denominator, starts_with } => {
                Box::new(LinearRamp::new(denominator).with_starts_with(starts_with))
            }
            CurveConfig::Cosine { t_max, min_multiplier } => {
                Box::new(CosineAnnealing::new(t_max).with_min_multiplier(min_multiplier))
            }
            CurveConfig::LinearDecay { total_steps } => Box::new(LinearDecay::new(total_steps)),
            CurveConfig::StepDecay { step_size, gamma } => Box::new(StepDecay::new(step_size, gamma)),
            CurveConfig::Exponential { gamma } => Box::new(ExponentialDecay::new(gamma)),
        }
    }
}

/// One stage of a sequence profile. `length` defaults to unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub curve: CurveConfig,
    #[serde(default = "unbounded")]
    pub length: SegmentLength,
}

/// A complete rate profile, as read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "profile", rename_all = "snake_case")]
pub enum ProfileConfig {
    WarmUp {
        warmup: WarmUpConfig,
        #[serde(default)]
        after: Option<CurveConfig>,
    },
    WarmUpCosine {
        warmup: WarmUpConfig,
        num_training_steps: usize,
    },
    WarmUpLinear {
        warmup: WarmUpConfig,
        num_training_steps: usize,
    },
    Sequence {
        stages: Vec<StageConfig>,
    },
}

impl ProfileConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidConfig(e.to_string()))
    }

    pub fn build(&self) -> ConfigResult<Box<dyn RateSchedule>> {
        let schedule: Box<dyn RateSchedule> = match self {
            ProfileConfig::WarmUp { warmup, after } => Box::new(WarmUpSchedule::new(
                warmup.clone(),
                after.as_ref().map(CurveConfig::build),
            )?),
            ProfileConfig::WarmUpCosine { warmup, num_training_steps } => Box::new(
                WarmUpSchedule::with_cosine_stage(warmup.clone(), *num_training_steps)?,
            ),
            ProfileConfig::WarmUpLinear { warmup, num_training_steps } => Box::new(
                WarmUpSchedule::with_linear_stage(warmup.clone(), *num_training_steps)?,
            ),
            ProfileConfig::Sequence { stages } => {
                let segments = stages
                    .iter()
                    .map(|stage| ScheduleSegment::new(stage.curve.build(), stage.length))
                    .collect();
                Box::new(SequenceComposer::new(segments)?)
            }
        };
        Ok(schedule)
    }
}
