pub mod backward_pass;
pub mod critical_path;
pub mod forward_pass;

pub use backward_pass::{BackwardPass, BackwardSchedule, LateDates};
pub use critical_path::{CriticalPathAnalysis, CriticalPathCalculator, TaskSchedule, critical_tasks};
pub use forward_pass::{EarlyDates, ForwardPass, ForwardSchedule};
