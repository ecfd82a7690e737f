//! taskrank - dependency-aware task scheduling
//!
//! Tasks carry a priority, a deadline and a list of tasks they depend on.
//! The [`TaskRegistry`] rejects registrations that would close a dependency
//! cycle, produces an execution order that puts dependencies first, and ranks
//! the tasks that can be started right now by urgency.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{
    DependencyGraph, Priority, SharedRegistry, Task, TaskError, TaskId, TaskRegistry, TaskStatus,
};
