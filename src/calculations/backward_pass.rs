use super::forward_pass::ForwardSchedule;
use crate::dependency::DependencyType;
use crate::graph::FlatGraph;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace, warn};

/// Latest start/finish offsets of one node. Unset until a successor (or the
/// end-of-project bookend) reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LateDates {
    pub start: Option<i64>,
    pub finish: Option<i64>,
}

impl LateDates {
    /// Moves the finish back to `candidate` if it is earlier, or sets it when
    /// unset. Returns whether anything changed.
    pub fn pull_finish(&mut self, candidate: i64, duration: i64) -> bool {
        if matches!(self.finish, Some(finish) if finish <= candidate) {
            return false;
        }
        self.finish = Some(candidate);
        self.start = Some(candidate - duration);
        true
    }
}

#[derive(Debug, Clone)]
pub struct BackwardSchedule {
    /// Indexed by node index.
    pub late: Vec<LateDates>,
    pub processed: Vec<bool>,
    /// Latest finish of the beginning-of-project bookend.
    pub project_start: Option<i64>,
}

impl BackwardSchedule {
    pub fn get(&self, ix: NodeIndex) -> LateDates {
        self.late[ix.index()]
    }
}

/// Latest dates pass, mirror of the forward pass from the end-of-project
/// bookend along incoming edges.
pub struct BackwardPass<'a, T> {
    graph: &'a FlatGraph<T>,
    forward: &'a ForwardSchedule,
}

impl<'a, T: Eq + Hash + Debug> BackwardPass<'a, T> {
    pub fn new(graph: &'a FlatGraph<T>, forward: &'a ForwardSchedule) -> Self {
        Self { graph, forward }
    }

    pub fn execute(&self) -> BackwardSchedule {
        let dag = &self.graph.graph;
        let mut late = vec![LateDates::default(); dag.node_count()];
        let mut remaining: Vec<usize> = dag
            .node_indices()
            .map(|ix| dag.neighbors_directed(ix, Direction::Outgoing).count())
            .collect();
        let mut processed = vec![false; dag.node_count()];
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();

        // The end bookend has no duration: latest start == latest finish ==
        // its earliest start. Every task that fed it in the forward pass
        // hangs from it here.
        let project_finish = self.forward.project_finish;
        let mut seeded = vec![false; dag.node_count()];
        let finishers = self.forward.finishers.iter().copied();
        for ix in self.graph.end.predecessors.iter().copied().chain(finishers) {
            if std::mem::replace(&mut seeded[ix.index()], true) {
                continue;
            }
            self.set_latest_finish(&mut late, ix, project_finish);
            if remaining[ix.index()] == 0 {
                queue.push_back(ix);
            }
        }

        let mut project_start: Option<i64> = None;
        while let Some(ix) = queue.pop_front() {
            let dates = late[ix.index()];
            let (Some(latest_start), Some(latest_finish)) = (dates.start, dates.finish) else {
                continue;
            };
            processed[ix.index()] = true;

            let mut incoming = 0usize;
            let mut end_end = 0usize;
            for edge in dag.edges_directed(ix, Direction::Incoming) {
                let previous = edge.source();
                incoming += 1;
                let candidate = match edge.weight() {
                    DependencyType::StartStart => latest_start + dag[previous].duration,
                    DependencyType::EndEnd => {
                        end_end += 1;
                        latest_finish
                    }
                    DependencyType::EndStart => latest_start,
                };
                self.set_latest_finish(&mut late, previous, candidate);

                let pending = &mut remaining[previous.index()];
                *pending -= 1;
                if *pending == 0 {
                    queue.push_back(previous);
                }
            }

            // Nothing starts before this task
            if incoming == end_end {
                project_start = Some(project_start.map_or(latest_start, |s| s.min(latest_start)));
            }
        }

        let unreached = processed.iter().filter(|done| !**done).count();
        if unreached > 0 {
            warn!(unreached, "backward pass left tasks unreached from the project end");
        }
        debug!(?project_start, project_finish, "backward pass complete");

        BackwardSchedule {
            late,
            processed,
            project_start,
        }
    }

    fn set_latest_finish(&self, late: &mut [LateDates], ix: NodeIndex, candidate: i64) {
        let node = self.graph.node(ix);
        let candidate = self.graph.constrain_finish(ix, candidate);
        let dates = &mut late[ix.index()];
        if dates.pull_finish(candidate, node.duration) {
            trace!(task = ?node.task, start = ?dates.start, finish = ?dates.finish, "latest dates moved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pull_always_assigns() {
        let mut dates = LateDates::default();
        assert!(dates.pull_finish(12, 4));
        assert_eq!(dates.start, Some(8));
        assert_eq!(dates.finish, Some(12));
    }

    #[test]
    fn pull_finish_is_monotonic() {
        let mut dates = LateDates::default();
        dates.pull_finish(12, 4);
        assert!(!dates.pull_finish(15, 4));
        assert!(dates.pull_finish(9, 4));
        assert_eq!(dates.start, Some(5));
    }
}
