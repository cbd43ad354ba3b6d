use super::{BeginningOfProject, EndOfProject, FlatGraph, TaskNode};
use crate::config::CriticalPathConfig;
use crate::constraint::ConstraintChain;
use crate::dependency::DependencyType;
use crate::view::TaskGraphView;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Flattens a hierarchical task view into a leaf-only [`FlatGraph`].
///
/// Containers contribute no node of their own. A dependency touching a
/// container is redistributed onto the cross product of the leaf descendants
/// on both sides, keeping the container dependency's type.
pub struct GraphBuilder<'a, V: TaskGraphView> {
    view: &'a V,
    config: &'a CriticalPathConfig,
}

impl<'a, V: TaskGraphView> GraphBuilder<'a, V> {
    pub fn new(view: &'a V, config: &'a CriticalPathConfig) -> Self {
        Self { view, config }
    }

    /// Returns `None` when the view holds no tasks, since there is no origin
    /// date to measure offsets from.
    pub fn build(&self) -> Option<FlatGraph<V::Task>> {
        let tasks = self.view.tasks();
        let origin = tasks.iter().map(|task| self.view.start_date(task)).min()?;

        let mut graph: DiGraph<TaskNode<V::Task>, DependencyType> = DiGraph::new();
        let mut id_to_index: HashMap<V::Task, NodeIndex> = HashMap::new();

        // Add leaf nodes first
        for task in tasks.iter().filter(|task| !self.view.is_container(task)) {
            if id_to_index.contains_key(task) {
                continue;
            }
            let node_ix = graph.add_node(self.create_node(task));
            id_to_index.insert(task.clone(), node_ix);
        }

        let mut flat = FlatGraph {
            graph,
            id_to_index,
            begin: BeginningOfProject::default(),
            end: EndOfProject::default(),
            origin,
        };

        // Leaf to leaf edges
        for task in tasks.iter().filter(|task| !self.view.is_container(task)) {
            for previous in self.without_containers(self.view.incoming_tasks(task)) {
                self.add_dependency(&mut flat, &previous, task);
            }
            for next in self.without_containers(self.view.outgoing_tasks(task)) {
                self.add_dependency(&mut flat, task, &next);
            }
        }

        // Container edges, redistributed onto leaves
        for container in tasks.iter().filter(|task| self.view.is_container(task)) {
            let all_children = self.leaves_of(container);

            let incoming =
                self.remove_children_and_parents(container, self.view.incoming_tasks(container));
            for origin_task in incoming {
                let kind = self
                    .view
                    .dependency_type(&origin_task, container)
                    .unwrap_or_default();
                let origins = self.leaves_of(&origin_task);
                self.add_redistributed(&mut flat, &origins, &all_children, kind);
            }

            let outgoing =
                self.remove_children_and_parents(container, self.view.outgoing_tasks(container));
            for destination_task in outgoing {
                let kind = self
                    .view
                    .dependency_type(container, &destination_task)
                    .unwrap_or_default();
                let destinations = self.leaves_of(&destination_task);
                self.add_redistributed(&mut flat, &all_children, &destinations, kind);
            }
        }

        flat.begin.successors = self.bookend_indices(&flat, self.view.initial_tasks(), |task| {
            self.view.has_visible_incoming_dependencies(task)
        });
        flat.end.predecessors = self.bookend_indices(&flat, self.view.latest_tasks(), |task| {
            self.view.has_visible_outgoing_dependencies(task)
        });

        debug!(
            nodes = flat.graph.node_count(),
            edges = flat.graph.edge_count(),
            initial = flat.begin.successors.len(),
            latest = flat.end.predecessors.len(),
            origin = %flat.origin,
            "built critical path graph"
        );

        Some(flat)
    }

    fn create_node(&self, task: &V::Task) -> TaskNode<V::Task> {
        let duration = (self.view.end_date(task) - self.view.start_date(task)).num_days();
        let constraints = if self.config.applies_constraints() {
            ConstraintChain::coalesce(
                self.view.start_constraints(task),
                self.view.end_constraints(task),
            )
        } else {
            None
        };
        TaskNode {
            task: task.clone(),
            duration,
            constraints,
        }
    }

    /// Leaf descendants of `task`, or `task` itself when it is a leaf.
    fn leaves_of(&self, task: &V::Task) -> Vec<V::Task> {
        if !self.view.is_container(task) {
            return vec![task.clone()];
        }
        self.view
            .children(task)
            .iter()
            .flat_map(|child| self.leaves_of(child))
            .collect()
    }

    fn without_containers(&self, tasks: Vec<V::Task>) -> Vec<V::Task> {
        tasks
            .into_iter()
            .filter(|task| !self.view.is_container(task))
            .collect()
    }

    /// Drops the container's own ancestors and descendants: a task cannot
    /// depend on the WBS branch it belongs to.
    fn remove_children_and_parents(
        &self,
        container: &V::Task,
        tasks: Vec<V::Task>,
    ) -> Vec<V::Task> {
        tasks
            .into_iter()
            .filter(|task| {
                !self.view.contains(container, task) && !self.view.contains(task, container)
            })
            .collect()
    }

    fn add_dependency(&self, flat: &mut FlatGraph<V::Task>, from: &V::Task, to: &V::Task) {
        let (Some(a), Some(b)) = (flat.node_index(from), flat.node_index(to)) else {
            warn!(?from, ?to, "dependency endpoint is not part of the task set, skipping");
            return;
        };
        if a == b {
            return;
        }
        let kind = self.view.dependency_type(from, to).unwrap_or_default();
        flat.graph.update_edge(a, b, kind);
    }

    fn add_redistributed(
        &self,
        flat: &mut FlatGraph<V::Task>,
        origins: &[V::Task],
        destinations: &[V::Task],
        kind: DependencyType,
    ) {
        for origin in origins {
            for destination in destinations {
                let (Some(a), Some(b)) = (flat.node_index(origin), flat.node_index(destination))
                else {
                    warn!(
                        ?origin,
                        ?destination,
                        "redistributed dependency endpoint is not part of the task set, skipping"
                    );
                    continue;
                };
                if a == b {
                    continue;
                }
                match flat.graph.find_edge(a, b) {
                    // An explicit leaf dependency keeps its own type
                    Some(_) if self.view.dependency_type(origin, destination).is_some() => {}
                    Some(edge) => flat.graph[edge] = kind,
                    None => {
                        flat.graph.add_edge(a, b, kind);
                    }
                }
            }
        }
    }

    fn bookend_indices<F>(
        &self,
        flat: &FlatGraph<V::Task>,
        roots: Vec<V::Task>,
        has_visible_dependency: F,
    ) -> Vec<NodeIndex>
    where
        F: Fn(&V::Task) -> bool,
    {
        let mut seen = HashSet::new();
        roots
            .iter()
            .flat_map(|root| self.leaves_of(root))
            .filter(|task| !has_visible_dependency(task))
            .filter_map(|task| flat.node_index(&task))
            .filter(|ix| seen.insert(*ix))
            .collect()
    }
}
