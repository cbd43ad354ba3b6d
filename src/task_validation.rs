use crate::error::{ProjectGraphError, ProjectGraphResult};
use crate::project::{DependencyRecord, TaskRecord};
use std::collections::HashSet;

pub fn validate_task(task: &TaskRecord) -> ProjectGraphResult<()> {
    if task.end < task.start {
        return Err(ProjectGraphError::EndBeforeStart {
            task: task.id,
            start: task.start,
            end: task.end,
        });
    }
    Ok(())
}

/// Parents must appear before their children.
pub fn validate_task_collection(tasks: &[TaskRecord]) -> ProjectGraphResult<()> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if let Some(parent) = task.parent_id {
            if !seen_ids.contains(&parent) {
                return Err(ProjectGraphError::UnknownParent {
                    task: task.id,
                    parent,
                });
            }
        }
        if !seen_ids.insert(task.id) {
            return Err(ProjectGraphError::DuplicateTask(task.id));
        }
        validate_task(task)?;
    }
    Ok(())
}

pub fn validate_dependency<F>(dependency: &DependencyRecord, is_known: F) -> ProjectGraphResult<()>
where
    F: Fn(i32) -> bool,
{
    if dependency.from == dependency.to {
        return Err(ProjectGraphError::SelfDependency(dependency.from));
    }
    for id in [dependency.from, dependency.to] {
        if !is_known(id) {
            return Err(ProjectGraphError::UnknownTask(id));
        }
    }
    Ok(())
}
