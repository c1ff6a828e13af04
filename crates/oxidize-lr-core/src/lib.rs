pub mod error;
pub mod schedule;

pub use error::{ConfigResult, ConfigurationError};
pub use schedule::{RateSchedule, SegmentLength};
