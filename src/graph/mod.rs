use crate::constraint::ConstraintChain;
use crate::dependency::DependencyType;
use chrono::{Duration, NaiveDate};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::hash::Hash;

pub mod builder;

pub use builder::GraphBuilder;

/// One leaf task of the flattened graph.
#[derive(Debug, Clone)]
pub struct TaskNode<T> {
    pub task: T,
    /// Whole days between the task's start and end dates.
    pub duration: i64,
    /// Coalesced start/end constraints, only present when they take part in
    /// the calculation.
    pub constraints: Option<ConstraintChain>,
}

/// Synthetic anchor before every task with no visible predecessor.
#[derive(Debug, Clone, Default)]
pub struct BeginningOfProject {
    pub successors: Vec<NodeIndex>,
}

/// Synthetic anchor after every task with no visible successor.
#[derive(Debug, Clone, Default)]
pub struct EndOfProject {
    pub predecessors: Vec<NodeIndex>,
}

/// Leaf-only dependency graph plus its bookends. Edges point from
/// predecessor to successor and carry the dependency type.
#[derive(Debug, Clone)]
pub struct FlatGraph<T> {
    pub graph: DiGraph<TaskNode<T>, DependencyType>,
    pub id_to_index: HashMap<T, NodeIndex>,
    pub begin: BeginningOfProject,
    pub end: EndOfProject,
    /// Earliest start date over all tasks; day offsets count from here.
    pub origin: NaiveDate,
}

impl<T: Eq + Hash> FlatGraph<T> {
    pub fn node(&self, ix: NodeIndex) -> &TaskNode<T> {
        &self.graph[ix]
    }

    pub fn node_index(&self, task: &T) -> Option<NodeIndex> {
        self.id_to_index.get(task).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn previous(&self, ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(ix, Direction::Incoming)
    }

    pub fn next(&self, ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(ix, Direction::Outgoing)
    }

    /// Dependency type of the edge `from -> to`, `END_START` when there is none.
    pub fn dependency_type(&self, from: NodeIndex, to: NodeIndex) -> DependencyType {
        self.graph
            .find_edge(from, to)
            .map(|edge| self.graph[edge])
            .unwrap_or_default()
    }

    pub fn date_for_offset(&self, offset: i64) -> Option<NaiveDate> {
        self.origin.checked_add_signed(Duration::days(offset))
    }

    pub fn offset_for_date(&self, date: NaiveDate) -> i64 {
        (date - self.origin).num_days()
    }

    /// Clamps a candidate earliest start offset with the node's constraints.
    pub fn constrain_start(&self, ix: NodeIndex, start: i64) -> i64 {
        let Some(chain) = &self.graph[ix].constraints else {
            return start;
        };
        match self.date_for_offset(start) {
            Some(date) => self.offset_for_date(chain.apply_to(date)),
            None => start,
        }
    }

    /// Clamps a candidate latest finish offset with the node's constraints.
    /// The constraints bound the start date, so the duration is taken off
    /// before and added back after.
    pub fn constrain_finish(&self, ix: NodeIndex, finish: i64) -> i64 {
        let node = &self.graph[ix];
        let Some(chain) = &node.constraints else {
            return finish;
        };
        match self.date_for_offset(finish - node.duration) {
            Some(date) => self.offset_for_date(chain.apply_to(date)) + node.duration,
            None => finish,
        }
    }

    /// A task sitting on a dependency cycle, if the graph has one.
    pub fn find_cycle(&self) -> Option<&T> {
        toposort(&self.graph, None)
            .err()
            .map(|cycle| &self.graph[cycle.node_id()].task)
    }
}
