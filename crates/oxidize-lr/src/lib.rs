//! # OxidizeLR 🦀
//!
//! Learning-rate schedules composed end-to-end, for training loops written in Rust.
//!
//! ## Modules
//!
//! - **core** — `RateSchedule` contract, `SegmentLength`, `ConfigurationError`
//! - **schedule** — Curves (cosine, linear, step, exponential), `SequenceComposer`, `WarmUpSchedule`, JSON profiles
//! - **optim** — Parameter groups and the `LrScheduler` that writes rates into an optimizer
//!
//! ```
//! use oxidize_lr::prelude::*;
//!
//! let mut optimizer = LrGroups::from_lrs(&[0.1, 0.01]);
//! let schedule = WarmUpSchedule::with_cosine_stage(WarmUpConfig::new(100), 1000).unwrap();
//! let mut scheduler = WarmUpScheduler::new(schedule, &mut optimizer);
//! for _ in 0..1000 {
//!     // optimizer step goes here
//!     scheduler.step(&mut optimizer);
//! }
//! ```

/// Schedule contract and error types.
pub use oxidize_lr_core as core;

/// Rate curves and composition.
pub use oxidize_lr_schedule as schedule;

/// Optimizer collaborator and scheduler driver.
pub use oxidize_lr_optim as optim;

/// Scheduler driving an optimizer with a warm-up profile.
pub type WarmUpScheduler = oxidize_lr_optim::LrScheduler<oxidize_lr_schedule::WarmUpSchedule>;

/// Scheduler driving an optimizer with an arbitrary sequence of schedules.
pub type CombinedScheduler = oxidize_lr_optim::LrScheduler<oxidize_lr_schedule::SequenceComposer>;

pub mod prelude {
    pub use crate::{CombinedScheduler, WarmUpScheduler};
    pub use oxidize_lr_core::{ConfigResult, ConfigurationError, RateSchedule, SegmentLength};
    pub use oxidize_lr_optim::{LrGroups, LrScheduler, Optimizer, ParamGroup};
    pub use oxidize_lr_schedule::{
        ConstantSchedule, CosineAnnealing, ExponentialDecay, LambdaSchedule, LinearDecay,
        LinearRamp, ProfileConfig, ScheduleSegment, SequenceComposer, StepDecay, WarmUpConfig,
        WarmUpPhase, WarmUpSchedule,
    };
}
