pub mod optimizer;
pub mod scheduler;

pub use optimizer::{LrGroups, Optimizer, ParamGroup};
pub use scheduler::LrScheduler;
