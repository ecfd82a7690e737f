//! Errors returned by the scheduling core
//!
//! Every failure is a value handed back to the caller; nothing here logs or
//! terminates the process.

use thiserror::Error;

use super::id::TaskId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// A dependency cycle was found. Holds the cycle as a path that starts
    /// and ends at the same task.
    #[error("Circular dependency detected: {}", format_cycle(.0))]
    CircularDependency(Vec<TaskId>),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid priority '{0}': expected 1-4 or low, medium, high, urgent")]
    InvalidPriority(String),

    #[error("Task ID already exists: {0}")]
    DuplicateId(TaskId),
}

fn format_cycle(path: &[TaskId]) -> String {
    path.iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
