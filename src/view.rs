//! Read-only view of a hierarchical task graph.
//!
//! The critical path calculation never owns or mutates the tasks it schedules.
//! A host (a Gantt diagram, a planning service, [`crate::ProjectGraph`]) exposes
//! its task graph through this trait and the calculation builds its own
//! working graph from it.

use crate::constraint::Constraint;
use crate::dependency::DependencyType;
use chrono::NaiveDate;
use std::fmt::Debug;
use std::hash::Hash;

pub trait TaskGraphView {
    /// Opaque task handle. Only compared, hashed and cloned.
    type Task: Clone + Eq + Hash + Debug;

    /// Every task in the graph, containers included. The order is kept in
    /// the results.
    fn tasks(&self) -> Vec<Self::Task>;

    /// WBS roots with no predecessor.
    fn initial_tasks(&self) -> Vec<Self::Task>;

    /// WBS roots with no successor.
    fn latest_tasks(&self) -> Vec<Self::Task>;

    fn is_container(&self, task: &Self::Task) -> bool;

    fn children(&self, task: &Self::Task) -> Vec<Self::Task>;

    /// Whether `task` is a (transitive) descendant of `ancestor`.
    fn contains(&self, ancestor: &Self::Task, task: &Self::Task) -> bool;

    fn incoming_tasks(&self, task: &Self::Task) -> Vec<Self::Task>;

    fn outgoing_tasks(&self, task: &Self::Task) -> Vec<Self::Task>;

    /// Type of the explicit dependency `from -> to`, if there is one.
    fn dependency_type(&self, from: &Self::Task, to: &Self::Task) -> Option<DependencyType>;

    fn start_date(&self, task: &Self::Task) -> NaiveDate;

    fn end_date(&self, task: &Self::Task) -> NaiveDate;

    fn has_visible_incoming_dependencies(&self, task: &Self::Task) -> bool;

    fn has_visible_outgoing_dependencies(&self, task: &Self::Task) -> bool;

    fn start_constraints(&self, task: &Self::Task) -> Vec<Constraint>;

    fn end_constraints(&self, task: &Self::Task) -> Vec<Constraint>;
}
