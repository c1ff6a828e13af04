pub mod composer;
pub mod config;
pub mod curves;
pub mod warmup;

pub use composer::{ScheduleSegment, SequenceComposer};
pub use config::{CurveConfig, ProfileConfig, StageConfig};
pub use curves::{
    ConstantSchedule, CosineAnnealing, ExponentialDecay, LambdaSchedule, LinearDecay, LinearRamp,
    StepDecay,
};
pub use warmup::{WarmUpConfig, WarmUpPhase, WarmUpSchedule};
