//! Domain models for taskrank
//!
//! Contains the scheduling core without any I/O concerns: tasks, the
//! registry that owns them, and the dependency graph algorithms.

mod id;
mod error;
mod task;
mod graph;
mod registry;
mod shared;

pub use id::{IdError, TaskId};
pub use error::TaskError;
pub use task::{sort_by_urgency, Priority, Task, TaskStatus};
pub use graph::DependencyGraph;
pub use registry::TaskRegistry;
pub use shared::SharedRegistry;
