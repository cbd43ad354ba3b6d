use super::backward_pass::{BackwardPass, BackwardSchedule};
use super::forward_pass::{ForwardPass, ForwardSchedule};
use crate::config::CriticalPathConfig;
use crate::error::CriticalPathError;
use crate::graph::{FlatGraph, GraphBuilder};
use crate::view::TaskGraphView;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// Computed dates of one leaf task, as day offsets from the project origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSchedule<T> {
    pub task: T,
    pub duration: i64,
    pub earliest_start: i64,
    pub earliest_finish: i64,
    /// Unset when the task is not reachable from the end of the project.
    pub latest_start: Option<i64>,
    pub latest_finish: Option<i64>,
}

impl<T> TaskSchedule<T> {
    /// Days the task can slip without delaying the project.
    pub fn slack(&self) -> Option<i64> {
        self.latest_start.map(|ls| ls - self.earliest_start)
    }

    pub fn is_critical(&self) -> bool {
        self.latest_start == Some(self.earliest_start)
    }

    pub fn earliest_start_date(&self, origin: NaiveDate) -> NaiveDate {
        origin + Duration::days(self.earliest_start)
    }

    pub fn earliest_finish_date(&self, origin: NaiveDate) -> NaiveDate {
        origin + Duration::days(self.earliest_finish)
    }

    pub fn latest_start_date(&self, origin: NaiveDate) -> Option<NaiveDate> {
        self.latest_start.map(|ls| origin + Duration::days(ls))
    }

    pub fn latest_finish_date(&self, origin: NaiveDate) -> Option<NaiveDate> {
        self.latest_finish.map(|lf| origin + Duration::days(lf))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPathAnalysis<T> {
    /// Earliest start date over all tasks. `None` for an empty graph.
    pub origin: Option<NaiveDate>,
    /// Earliest finish of the whole project, in days from the origin.
    pub project_finish: i64,
    /// One entry per leaf task, in the order the view listed them.
    pub tasks: Vec<TaskSchedule<T>>,
    pub critical_path: Vec<T>,
}

impl<T: PartialEq> CriticalPathAnalysis<T> {
    pub fn empty() -> Self {
        Self {
            origin: None,
            project_finish: 0,
            tasks: Vec::new(),
            critical_path: Vec::new(),
        }
    }

    pub fn schedule_for(&self, task: &T) -> Option<&TaskSchedule<T>> {
        self.tasks.iter().find(|schedule| &schedule.task == task)
    }

    pub fn is_critical(&self, task: &T) -> bool {
        self.critical_path.contains(task)
    }

    pub fn project_finish_date(&self) -> Option<NaiveDate> {
        self.origin
            .map(|origin| origin + Duration::days(self.project_finish))
    }
}

/// Every task whose earliest start equals its latest start, in node order.
pub fn critical_tasks<T: Clone + Eq + Hash>(
    graph: &FlatGraph<T>,
    forward: &ForwardSchedule,
    backward: &BackwardSchedule,
) -> Vec<T> {
    graph
        .graph
        .node_indices()
        .filter(|&ix| backward.get(ix).start == Some(forward.get(ix).start))
        .map(|ix| graph.node(ix).task.clone())
        .collect()
}

/// Runs graph flattening, both passes and critical task extraction.
#[derive(Debug, Clone, Default)]
pub struct CriticalPathCalculator {
    config: CriticalPathConfig,
}

impl CriticalPathCalculator {
    pub fn new(config: CriticalPathConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CriticalPathConfig {
        &self.config
    }

    pub fn calculate<V: TaskGraphView>(&self, view: &V) -> Result<Vec<V::Task>, CriticalPathError> {
        Ok(self.analyze(view)?.critical_path)
    }

    pub fn analyze<V: TaskGraphView>(
        &self,
        view: &V,
    ) -> Result<CriticalPathAnalysis<V::Task>, CriticalPathError> {
        let Some(graph) = GraphBuilder::new(view, &self.config).build() else {
            debug!("no tasks, empty critical path");
            return Ok(CriticalPathAnalysis::empty());
        };

        if let Some(task) = graph.find_cycle() {
            return Err(CriticalPathError::CyclicGraph {
                task: format!("{task:?}"),
            });
        }

        let forward = ForwardPass::new(&graph).execute();
        let backward = BackwardPass::new(&graph, &forward).execute();
        let critical_path = critical_tasks(&graph, &forward, &backward);

        let tasks = graph
            .graph
            .node_indices()
            .map(|ix| {
                let node = graph.node(ix);
                let early = forward.get(ix);
                let late = backward.get(ix);
                TaskSchedule {
                    task: node.task.clone(),
                    duration: node.duration,
                    earliest_start: early.start,
                    earliest_finish: early.finish,
                    latest_start: late.start,
                    latest_finish: late.finish,
                }
            })
            .collect();

        debug!(
            tasks = graph.node_count(),
            critical = critical_path.len(),
            project_finish = forward.project_finish,
            "critical path calculated"
        );

        Ok(CriticalPathAnalysis {
            origin: Some(graph.origin),
            project_finish: forward.project_finish,
            tasks,
            critical_path,
        })
    }
}

/// Critical tasks of `view`, in the order [`TaskGraphView::tasks`] lists them.
///
/// With `dependencies_constraints_have_priority` set, task date constraints
/// are ignored.
pub fn calculate_critical_path<V: TaskGraphView>(
    view: &V,
    dependencies_constraints_have_priority: bool,
) -> Result<Vec<V::Task>, CriticalPathError> {
    CriticalPathCalculator::new(CriticalPathConfig::new(dependencies_constraints_have_priority))
        .calculate(view)
}
