use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriticalPathError {
    #[error("cycle detected in task graph through task {task}")]
    CyclicGraph { task: String },
}

#[derive(Debug, Error)]
pub enum ProjectGraphError {
    #[error("duplicate task id {0}")]
    DuplicateTask(i32),
    #[error("unknown task id {0}")]
    UnknownTask(i32),
    #[error("task {task} references unknown parent {parent}")]
    UnknownParent { task: i32, parent: i32 },
    #[error("task {task} ends on {end} before it starts on {start}")]
    EndBeforeStart {
        task: i32,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("task {0} cannot depend on itself")]
    SelfDependency(i32),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ProjectGraphResult<T> = Result<T, ProjectGraphError>;
