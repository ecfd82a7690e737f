//! Thread-safe registry handle
//!
//! Mutations take the write lock, so cycle detection always sees a
//! consistent graph. Queries run under the read lock and may overlap each
//! other but never a mutation.

use std::sync::{Arc, PoisonError, RwLock};

use super::error::TaskError;
use super::registry::TaskRegistry;
use super::task::{Task, TaskStatus};

/// Cloneable handle to a registry shared between threads
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<TaskRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: TaskRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Registers a task under the write lock
    pub fn insert(&self, task: Task) -> Result<(), TaskError> {
        self.write(|registry| registry.insert(task))
    }

    /// Sets a task's status under the write lock
    pub fn update_status(&self, id: &str, status: TaskStatus) -> Result<(), TaskError> {
        self.write(|registry| registry.update_status(id, status))
    }

    /// Runs a query against a consistent snapshot
    pub fn read<R>(&self, query: impl FnOnce(&TaskRegistry) -> R) -> R {
        // A panicking writer cannot leave a half-inserted task behind
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        query(&guard)
    }

    fn write<R>(&self, mutation: impl FnOnce(&mut TaskRegistry) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        mutation(&mut guard)
    }
}

impl From<TaskRegistry> for SharedRegistry {
    fn from(registry: TaskRegistry) -> Self {
        Self::new(registry)
    }
}
