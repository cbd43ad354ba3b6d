//! In-memory work breakdown structure implementing [`TaskGraphView`].

use crate::constraint::Constraint;
use crate::dependency::DependencyType;
use crate::error::{ProjectGraphError, ProjectGraphResult};
use crate::task_validation;
use crate::view::TaskGraphView;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Enclosing container. A task with children is a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub end_constraints: Vec<Constraint>,
}

impl TaskRecord {
    pub fn new(id: i32, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            end,
            parent_id: None,
            start_constraints: Vec::new(),
            end_constraints: Vec::new(),
        }
    }

    pub fn with_duration(
        id: i32,
        name: impl Into<String>,
        start: NaiveDate,
        duration_days: i64,
    ) -> Self {
        Self::new(id, name, start, start + Duration::days(duration_days))
    }

    pub fn child_of(mut self, parent_id: i32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_start_constraint(mut self, constraint: Constraint) -> Self {
        self.start_constraints.push(constraint);
        self
    }

    pub fn with_end_constraint(mut self, constraint: Constraint) -> Self {
        self.end_constraints.push(constraint);
        self
    }

    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub from: i32,
    pub to: i32,
    #[serde(default)]
    pub kind: DependencyType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    tasks: Vec<TaskRecord>,
    id_to_position: HashMap<i32, usize>,
    children: HashMap<i32, Vec<i32>>,
    dependencies: Vec<DependencyRecord>,
}

impl ProjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task. Its parent, if any, must already be present.
    pub fn add_task(&mut self, task: TaskRecord) -> ProjectGraphResult<()> {
        task_validation::validate_task(&task)?;
        if self.id_to_position.contains_key(&task.id) {
            return Err(ProjectGraphError::DuplicateTask(task.id));
        }
        if let Some(parent) = task.parent_id {
            if !self.id_to_position.contains_key(&parent) {
                return Err(ProjectGraphError::UnknownParent {
                    task: task.id,
                    parent,
                });
            }
            self.children.entry(parent).or_default().push(task.id);
        }
        self.id_to_position.insert(task.id, self.tasks.len());
        self.tasks.push(task);
        Ok(())
    }

    /// Adds a dependency, replacing the type of an existing one between the
    /// same pair.
    pub fn add_dependency(
        &mut self,
        from: i32,
        to: i32,
        kind: DependencyType,
    ) -> ProjectGraphResult<()> {
        let dependency = DependencyRecord { from, to, kind };
        task_validation::validate_dependency(&dependency, |id| {
            self.id_to_position.contains_key(&id)
        })?;
        match self
            .dependencies
            .iter_mut()
            .find(|existing| existing.from == from && existing.to == to)
        {
            Some(existing) => existing.kind = kind,
            None => self.dependencies.push(dependency),
        }
        Ok(())
    }

    pub fn from_snapshot(snapshot: ProjectSnapshot) -> ProjectGraphResult<Self> {
        task_validation::validate_task_collection(&snapshot.tasks)?;
        let mut graph = Self::new();
        for task in snapshot.tasks {
            graph.add_task(task)?;
        }
        for dependency in snapshot.dependencies {
            graph.add_dependency(dependency.from, dependency.to, dependency.kind)?;
        }
        Ok(graph)
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            tasks: self.tasks.clone(),
            dependencies: self.dependencies.clone(),
        }
    }

    pub fn from_json(json: &str) -> ProjectGraphResult<Self> {
        let snapshot: ProjectSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    pub fn to_json(&self) -> ProjectGraphResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn task(&self, id: i32) -> Option<&TaskRecord> {
        self.id_to_position.get(&id).map(|&pos| &self.tasks[pos])
    }

    pub fn dependencies(&self) -> &[DependencyRecord] {
        &self.dependencies
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn roots(&self) -> impl Iterator<Item = i32> + '_ {
        self.tasks
            .iter()
            .filter(|task| task.parent_id.is_none())
            .map(|task| task.id)
    }
}

impl TaskGraphView for ProjectGraph {
    type Task = i32;

    fn tasks(&self) -> Vec<i32> {
        self.tasks.iter().map(|task| task.id).collect()
    }

    fn initial_tasks(&self) -> Vec<i32> {
        self.roots()
            .filter(|id| !self.has_visible_incoming_dependencies(id))
            .collect()
    }

    fn latest_tasks(&self) -> Vec<i32> {
        self.roots()
            .filter(|id| !self.has_visible_outgoing_dependencies(id))
            .collect()
    }

    fn is_container(&self, task: &i32) -> bool {
        self.children.get(task).is_some_and(|children| !children.is_empty())
    }

    fn children(&self, task: &i32) -> Vec<i32> {
        self.children.get(task).cloned().unwrap_or_default()
    }

    fn contains(&self, ancestor: &i32, task: &i32) -> bool {
        let mut current = self.task(*task).and_then(|record| record.parent_id);
        while let Some(parent) = current {
            if parent == *ancestor {
                return true;
            }
            current = self.task(parent).and_then(|record| record.parent_id);
        }
        false
    }

    fn incoming_tasks(&self, task: &i32) -> Vec<i32> {
        self.dependencies
            .iter()
            .filter(|dependency| dependency.to == *task)
            .map(|dependency| dependency.from)
            .collect()
    }

    fn outgoing_tasks(&self, task: &i32) -> Vec<i32> {
        self.dependencies
            .iter()
            .filter(|dependency| dependency.from == *task)
            .map(|dependency| dependency.to)
            .collect()
    }

    fn dependency_type(&self, from: &i32, to: &i32) -> Option<DependencyType> {
        self.dependencies
            .iter()
            .find(|dependency| dependency.from == *from && dependency.to == *to)
            .map(|dependency| dependency.kind)
    }

    fn start_date(&self, task: &i32) -> NaiveDate {
        self.task(*task).map(|record| record.start).unwrap_or_default()
    }

    fn end_date(&self, task: &i32) -> NaiveDate {
        self.task(*task).map(|record| record.end).unwrap_or_default()
    }

    fn has_visible_incoming_dependencies(&self, task: &i32) -> bool {
        self.dependencies.iter().any(|dependency| dependency.to == *task)
    }

    fn has_visible_outgoing_dependencies(&self, task: &i32) -> bool {
        self.dependencies.iter().any(|dependency| dependency.from == *task)
    }

    fn start_constraints(&self, task: &i32) -> Vec<Constraint> {
        self.task(*task)
            .map(|record| record.start_constraints.clone())
            .unwrap_or_default()
    }

    fn end_constraints(&self, task: &i32) -> Vec<Constraint> {
        self.task(*task)
            .map(|record| record.end_constraints.clone())
            .unwrap_or_default()
    }
}
