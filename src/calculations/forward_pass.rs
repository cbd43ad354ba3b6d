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

/// Earliest start/finish offsets of one node, in days from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EarlyDates {
    pub start: i64,
    pub finish: i64,
}

impl EarlyDates {
    pub fn new(duration: i64) -> Self {
        Self {
            start: 0,
            finish: duration,
        }
    }

    /// Moves the start forward to `candidate` if it is later. The start never
    /// moves back. Returns whether anything changed.
    pub fn push_start(&mut self, candidate: i64, duration: i64) -> bool {
        if candidate <= self.start {
            return false;
        }
        self.start = candidate;
        self.finish = candidate + duration;
        true
    }
}

#[derive(Debug, Clone)]
pub struct ForwardSchedule {
    /// Indexed by node index.
    pub early: Vec<EarlyDates>,
    pub processed: Vec<bool>,
    /// Earliest start of the end-of-project bookend.
    pub project_finish: i64,
    /// Tasks that fed the end-of-project bookend: no successors, or only
    /// `START_START` ones.
    pub finishers: Vec<NodeIndex>,
}

impl ForwardSchedule {
    pub fn get(&self, ix: NodeIndex) -> EarlyDates {
        self.early[ix.index()]
    }
}

/// Earliest dates pass, from the beginning-of-project bookend.
///
/// Worklist over the flattened graph: a node is expanded once every direct
/// predecessor has been expanded, so its earliest start is final by then.
pub struct ForwardPass<'a, T> {
    graph: &'a FlatGraph<T>,
}

impl<'a, T: Eq + Hash + Debug> ForwardPass<'a, T> {
    pub fn new(graph: &'a FlatGraph<T>) -> Self {
        Self { graph }
    }

    pub fn execute(&self) -> ForwardSchedule {
        let dag = &self.graph.graph;
        let mut early: Vec<EarlyDates> = dag
            .node_indices()
            .map(|ix| EarlyDates::new(dag[ix].duration))
            .collect();
        let mut remaining: Vec<usize> = dag
            .node_indices()
            .map(|ix| dag.neighbors_directed(ix, Direction::Incoming).count())
            .collect();
        let mut processed = vec![false; dag.node_count()];
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();

        // The bookend starts and finishes at offset 0. Tasks without any
        // predecessor hang from it even when the view did not list them.
        let mut seeded = vec![false; dag.node_count()];
        let roots = dag
            .node_indices()
            .filter(|ix| remaining[ix.index()] == 0);
        for ix in self.graph.begin.successors.iter().copied().chain(roots) {
            if std::mem::replace(&mut seeded[ix.index()], true) {
                continue;
            }
            self.set_earliest_start(&mut early, ix, 0);
            if remaining[ix.index()] == 0 {
                queue.push_back(ix);
            }
        }

        let mut project_finish = 0;
        let mut finishers = Vec::new();
        while let Some(ix) = queue.pop_front() {
            processed[ix.index()] = true;
            let current = early[ix.index()];

            let mut outgoing = 0usize;
            let mut start_start = 0usize;
            for edge in dag.edges_directed(ix, Direction::Outgoing) {
                let next = edge.target();
                outgoing += 1;
                let candidate = match edge.weight() {
                    DependencyType::StartStart => {
                        start_start += 1;
                        current.start
                    }
                    DependencyType::EndEnd => current.finish - dag[next].duration,
                    DependencyType::EndStart => current.finish,
                };
                self.set_earliest_start(&mut early, next, candidate);

                let pending = &mut remaining[next.index()];
                *pending -= 1;
                if *pending == 0 {
                    queue.push_back(next);
                }
            }

            // Nothing finishes after this task
            if outgoing == start_start {
                project_finish = project_finish.max(current.finish);
                finishers.push(ix);
            }
        }

        let unreached = processed.iter().filter(|done| !**done).count();
        if unreached > 0 {
            warn!(unreached, "forward pass left tasks unreached from the project start");
        }
        debug!(project_finish, "forward pass complete");

        ForwardSchedule {
            early,
            processed,
            project_finish,
            finishers,
        }
    }

    fn set_earliest_start(&self, early: &mut [EarlyDates], ix: NodeIndex, candidate: i64) {
        let node = self.graph.node(ix);
        let candidate = self.graph.constrain_start(ix, candidate);
        let dates = &mut early[ix.index()];
        if dates.push_start(candidate, node.duration) {
            trace!(task = ?node.task, start = dates.start, finish = dates.finish, "earliest dates moved");
        }
    }
}
