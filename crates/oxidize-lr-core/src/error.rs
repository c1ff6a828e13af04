use thiserror::Error;

/// Construction-time error for every schedule in OxidizeLR.
///
/// Stepping a schedule never fails; all checks happen when it is built.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Empty schedule: at least one segment is required")]
    EmptySchedule,

    #[error("Multiple unbounded segments: found {count}, at most one is allowed")]
    MultipleUnbounded { count: usize },

    #[error("Unbounded segment at index {index} is not last (sequence has {len} segments)")]
    UnboundedNotLast { index: usize, len: usize },

    #[error("Step count mismatch: {schedules} schedules need {expected} step counts, got {steps}")]
    StepCountMismatch {
        schedules: usize,
        expected: String,
        steps: usize,
    },

    #[error("No active segment: every segment has zero length")]
    NoActiveSegment,

    #[error("Training horizon too short: num_training_steps ({num_training_steps}) must exceed warmup_steps ({warmup_steps})")]
    TrainingHorizonTooShort {
        warmup_steps: usize,
        num_training_steps: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
