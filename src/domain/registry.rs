//! Task registry
//!
//! Owns every registered task in insertion order and is the only place a
//! task's status can change. Insertion is validated against the dependency
//! graph so the registry never holds a cycle.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use super::error::TaskError;
use super::graph::DependencyGraph;
use super::id::TaskId;
use super::task::{sort_by_urgency, Priority, Task, TaskStatus};

/// The collection of registered tasks
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    /// Tasks in insertion order
    tasks: Vec<Task>,

    /// Map from TaskId to position in `tasks`
    index: HashMap<TaskId, usize>,
}

impl TaskRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry by inserting tasks in the given order
    ///
    /// Fails on the first task that `insert` rejects.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self, TaskError> {
        let mut registry = Self::new();
        for task in tasks {
            registry.insert(task)?;
        }
        Ok(registry)
    }

    /// Registers a task
    ///
    /// Rejects a reused ID with [`TaskError::DuplicateId`] and a task whose
    /// dependencies would close a cycle with [`TaskError::CircularDependency`].
    /// On error the registry is left untouched.
    pub fn insert(&mut self, task: Task) -> Result<(), TaskError> {
        if self.index.contains_key(&task.id) {
            return Err(TaskError::DuplicateId(task.id));
        }

        if let Some(cycle) = self.graph().find_cycle_with(&task) {
            return Err(TaskError::CircularDependency(cycle));
        }

        self.index.insert(task.id.clone(), self.tasks.len());
        self.tasks.push(task);
        Ok(())
    }

    /// Looks up a task by ID
    pub fn find_by_id(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    /// Returns true if a task with this ID is registered
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Sets a task's status
    ///
    /// Any status may follow any other; setting the current status again is
    /// a no-op that still succeeds.
    pub fn update_status(&mut self, id: &str, status: TaskStatus) -> Result<(), TaskError> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))?;

        self.tasks[i].set_status(status);
        Ok(())
    }

    /// Pending tasks whose dependencies are all registered and completed,
    /// most urgent first
    pub fn executable_tasks(&self, now: NaiveDateTime) -> Vec<&Task> {
        let mut ready: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.status().is_pending() && self.dependencies_met(task))
            .collect();
        sort_by_urgency(&mut ready, now);
        ready
    }

    /// Every incomplete task, dependencies before dependents
    pub fn execution_order(&self) -> Result<Vec<&Task>, TaskError> {
        self.graph().execution_order()
    }

    /// Incomplete tasks past their deadline, in insertion order
    pub fn overdue_tasks(&self, now: NaiveDateTime) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.is_overdue(now)).collect()
    }

    /// Tasks with the given priority, in insertion order
    pub fn tasks_by_priority(&self, priority: Priority) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.priority == priority)
            .collect()
    }

    /// Incomplete tasks, most urgent first
    pub fn ranked_by_urgency(&self, now: NaiveDateTime) -> Vec<&Task> {
        let mut ranked: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| !task.status().is_complete())
            .collect();
        sort_by_urgency(&mut ranked, now);
        ranked
    }

    /// The most urgent task that can be started right now
    pub fn recommend_next(&self, now: NaiveDateTime) -> Option<&Task> {
        self.executable_tasks(now).into_iter().next()
    }

    /// Dependencies of `task` that are missing or not yet completed
    pub fn unmet_dependencies<'t>(&self, task: &'t Task) -> Vec<&'t TaskId> {
        task.dependencies
            .iter()
            .filter(|dep| !self.is_completed(dep.as_str()))
            .collect()
    }

    /// Registered tasks that list `id` as a dependency
    pub fn dependents(&self, id: &str) -> Vec<&Task> {
        self.graph().dependents(id)
    }

    /// Returns a dependency graph view over the registered tasks
    pub fn graph(&self) -> DependencyGraph<'_> {
        DependencyGraph::new(&self.tasks, &self.index)
    }

    /// Iterates over tasks in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Returns the number of registered tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no task is registered
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn is_completed(&self, id: &str) -> bool {
        self.find_by_id(id)
            .map(|task| task.status().is_complete())
            .unwrap_or(false)
    }

    fn dependencies_met(&self, task: &Task) -> bool {
        task.dependencies
            .iter()
            .all(|dep| self.is_completed(dep.as_str()))
    }
}

impl<'a> IntoIterator for &'a TaskRegistry {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn id(s: &str) -> TaskId {
        TaskId::new(s).unwrap()
    }

    fn make_task(name: &str, deps: &[&str]) -> Task {
        Task::new(id(name), name, Priority::Medium, now() + Duration::days(30))
            .with_dependencies(deps.iter().map(|d| id(d)))
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn empty_registry() {
        let registry = TaskRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.find_by_id("T1").is_none());
        assert!(registry.execution_order().unwrap().is_empty());
        assert!(registry.recommend_next(now()).is_none());
    }

    #[test]
    fn insert_and_find() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("T1", &[])).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("T1"));
        assert_eq!(registry.find_by_id("T1").unwrap().title, "T1");
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("T1", &[])).unwrap();

        let duplicate = make_task("T1", &["T0"]);
        assert_eq!(
            registry.insert(duplicate),
            Err(TaskError::DuplicateId(id("T1")))
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.find_by_id("T1").unwrap().dependencies.is_empty());
    }

    #[test]
    fn scenario_a_linear_order() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("T1", &[])).unwrap();
        registry.insert(make_task("T2", &["T1"])).unwrap();

        let order = registry.execution_order().unwrap();
        assert_eq!(ids(&order), vec!["T1", "T2"]);
    }

    #[test]
    fn scenario_b_cycle_rejected_without_partial_insert() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("T1", &["T2"])).unwrap();

        let result = registry.insert(make_task("T2", &["T1"]));
        assert!(matches!(result, Err(TaskError::CircularDependency(_))));

        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("T2"));
        assert_eq!(
            registry.find_by_id("T1").unwrap().dependencies,
            vec![id("T2")]
        );
    }

    #[test]
    fn self_dependency_rejected() {
        let mut registry = TaskRegistry::new();
        let result = registry.insert(make_task("T1", &["T1"]));

        assert_eq!(
            result,
            Err(TaskError::CircularDependency(vec![id("T1"), id("T1")]))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn transitive_cycle_rejected() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("A", &["B"])).unwrap();
        registry.insert(make_task("B", &["C"])).unwrap();

        let result = registry.insert(make_task("C", &["A"]));
        assert!(matches!(result, Err(TaskError::CircularDependency(_))));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn scenario_d_executable_after_completion() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("T1", &[])).unwrap();
        registry.insert(make_task("T2", &["T1"])).unwrap();

        // Only T1 has no dependencies
        assert_eq!(ids(&registry.executable_tasks(now())), vec!["T1"]);

        registry.update_status("T1", TaskStatus::Completed).unwrap();
        assert_eq!(ids(&registry.executable_tasks(now())), vec!["T2"]);
    }

    #[test]
    fn missing_dependency_blocks_execution() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("T1", &["ghost"])).unwrap();

        assert!(registry.executable_tasks(now()).is_empty());
        assert_eq!(
            registry.unmet_dependencies(registry.find_by_id("T1").unwrap()),
            vec![&id("ghost")]
        );
    }

    #[test]
    fn only_pending_tasks_are_executable() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("P", &[])).unwrap();
        registry.insert(make_task("I", &[])).unwrap();
        registry.insert(make_task("B", &[])).unwrap();
        registry.insert(make_task("C", &[])).unwrap();
        registry.update_status("I", TaskStatus::InProgress).unwrap();
        registry.update_status("B", TaskStatus::Blocked).unwrap();
        registry.update_status("C", TaskStatus::Completed).unwrap();

        assert_eq!(ids(&registry.executable_tasks(now())), vec!["P"]);
    }

    #[test]
    fn executable_tasks_sorted_by_urgency() {
        let base = now();
        let mut registry = TaskRegistry::new();
        registry
            .insert(Task::new(id("later"), "later", Priority::Urgent, base + Duration::days(10)))
            .unwrap();
        registry
            .insert(Task::new(id("soon"), "soon", Priority::Low, base + Duration::hours(2)))
            .unwrap();
        registry
            .insert(Task::new(id("tie"), "tie", Priority::Urgent, base + Duration::days(10)))
            .unwrap();

        let ready = registry.executable_tasks(base);
        assert_eq!(ids(&ready), vec!["soon", "later", "tie"]);
        assert_eq!(registry.recommend_next(base).unwrap().id.as_str(), "soon");
    }

    #[test]
    fn update_status_unknown_task() {
        let mut registry = TaskRegistry::new();
        assert_eq!(
            registry.update_status("nope", TaskStatus::Completed),
            Err(TaskError::TaskNotFound("nope".to_string()))
        );
    }

    #[test]
    fn update_status_is_idempotent() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("T1", &[])).unwrap();

        registry.update_status("T1", TaskStatus::Completed).unwrap();
        registry.update_status("T1", TaskStatus::Completed).unwrap();
        assert_eq!(
            registry.find_by_id("T1").unwrap().status(),
            TaskStatus::Completed
        );
    }

    #[test]
    fn any_transition_allowed() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("T1", &[])).unwrap();

        for status in [
            TaskStatus::Completed,
            TaskStatus::Blocked,
            TaskStatus::InProgress,
            TaskStatus::Pending,
        ] {
            registry.update_status("T1", status).unwrap();
            assert_eq!(registry.find_by_id("T1").unwrap().status(), status);
        }
    }

    #[test]
    fn overdue_and_priority_queries() {
        let base = now();
        let mut registry = TaskRegistry::new();
        registry
            .insert(Task::new(id("late"), "late", Priority::High, base - Duration::hours(3)))
            .unwrap();
        registry
            .insert(Task::new(id("done-late"), "done", Priority::High, base - Duration::hours(3)))
            .unwrap();
        registry
            .insert(Task::new(id("fine"), "fine", Priority::Low, base + Duration::hours(3)))
            .unwrap();
        registry
            .update_status("done-late", TaskStatus::Completed)
            .unwrap();

        assert_eq!(ids(&registry.overdue_tasks(base)), vec!["late"]);
        assert_eq!(
            ids(&registry.tasks_by_priority(Priority::High)),
            vec!["late", "done-late"]
        );
        assert!(registry.tasks_by_priority(Priority::Urgent).is_empty());
    }

    #[test]
    fn ranked_by_urgency_excludes_completed() {
        let base = now();
        let mut registry = TaskRegistry::new();
        registry
            .insert(Task::new(id("a"), "a", Priority::Low, base + Duration::days(30)))
            .unwrap();
        registry
            .insert(Task::new(id("b"), "b", Priority::Urgent, base + Duration::hours(1)))
            .unwrap();
        registry
            .insert(Task::new(id("c"), "c", Priority::High, base + Duration::hours(1)).depends_on(id("b")))
            .unwrap();
        registry.update_status("a", TaskStatus::Completed).unwrap();

        assert_eq!(ids(&registry.ranked_by_urgency(base)), vec!["b", "c"]);
    }

    #[test]
    fn dependents_lookup() {
        let mut registry = TaskRegistry::new();
        registry.insert(make_task("T1", &[])).unwrap();
        registry.insert(make_task("T2", &["T1"])).unwrap();
        registry.insert(make_task("T3", &["T1"])).unwrap();

        assert_eq!(ids(&registry.dependents("T1")), vec!["T2", "T3"]);
    }

    #[test]
    fn from_tasks_replays_inserts() {
        let registry =
            TaskRegistry::from_tasks([make_task("T1", &[]), make_task("T2", &["T1"])]).unwrap();
        assert_eq!(ids(&registry.iter().collect::<Vec<_>>()), vec!["T1", "T2"]);

        let result = TaskRegistry::from_tasks([make_task("T1", &[]), make_task("T1", &[])]);
        assert!(matches!(result, Err(TaskError::DuplicateId(_))));
    }

    #[test]
    fn performance_500_tasks() {
        use std::time::Instant;

        let mut registry = TaskRegistry::new();
        for i in 0..500 {
            let task = if i == 0 {
                make_task("t0", &[])
            } else {
                let prev = format!("t{}", i - 1);
                make_task(&format!("t{}", i), &[prev.as_str()])
            };
            registry.insert(task).unwrap();
        }

        let start = Instant::now();
        let order = registry.execution_order().unwrap();
        let _ready = registry.executable_tasks(now());
        let duration = start.elapsed();

        assert_eq!(order.len(), 500);
        assert!(duration.as_millis() < 50, "Queries took {:?}", duration);
    }
}
