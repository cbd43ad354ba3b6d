//! Critical Path Method over a hierarchical task graph.
//!
//! A host exposes its tasks through [`TaskGraphView`]. The calculation
//! flattens containers onto their leaf tasks, runs an earliest-dates pass
//! from the beginning of the project and a latest-dates pass from its end,
//! and reports the tasks with zero slack.

pub mod calculations;
pub mod config;
pub mod constraint;
pub mod dependency;
pub mod error;
pub mod graph;
pub mod project;
pub(crate) mod task_validation;
pub mod view;

pub use calculations::critical_path::calculate_critical_path;
pub use calculations::{CriticalPathAnalysis, CriticalPathCalculator, TaskSchedule};
pub use config::CriticalPathConfig;
pub use constraint::{Constraint, ConstraintChain};
pub use dependency::DependencyType;
pub use error::{CriticalPathError, ProjectGraphError, ProjectGraphResult};
pub use project::{DependencyRecord, ProjectGraph, ProjectSnapshot, TaskRecord};
pub use view::TaskGraphView;
