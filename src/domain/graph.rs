//! Dependency graph for tasks
//!
//! A read-only view over the registry's tasks with cycle detection and
//! topological ordering. Edges point from a task to the tasks it requires.
//!
//! Traversal is depth-first with an explicit stack and a three-color map, so
//! long dependency chains never exhaust the call stack:
//! - white: not seen yet
//! - gray: on the current path (meeting one again means a cycle)
//! - black: fully explored

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::iter;

use super::error::TaskError;
use super::id::TaskId;
use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Iterative depth-first walker shared by cycle detection and ordering
struct DepthFirst<'a, F> {
    dependencies_of: F,
    colors: HashMap<&'a TaskId, Color>,
}

impl<'a, F> DepthFirst<'a, F>
where
    F: Fn(&TaskId) -> Option<&'a [TaskId]>,
{
    fn new(dependencies_of: F) -> Self {
        Self {
            dependencies_of,
            colors: HashMap::new(),
        }
    }

    fn color(&self, id: &TaskId) -> Color {
        self.colors.get(id).copied().unwrap_or(Color::White)
    }

    /// Explores everything reachable from `root`, calling `finished` on each
    /// node once all of its dependencies are finished.
    ///
    /// IDs for which `dependencies_of` returns `None` are unknown and skipped.
    /// Returns the cycle path if a gray node is reached again.
    fn visit(
        &mut self,
        root: &'a TaskId,
        mut finished: impl FnMut(&'a TaskId),
    ) -> Result<(), Vec<TaskId>> {
        if self.color(root) != Color::White {
            return Ok(());
        }

        let mut stack: Vec<(&'a TaskId, usize)> = vec![(root, 0)];
        self.colors.insert(root, Color::Gray);

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let deps = (self.dependencies_of)(node).unwrap_or(&[]);

            match deps.get(frame.1) {
                Some(dep) => {
                    frame.1 += 1;
                    match self.color(dep) {
                        Color::Gray => return Err(cycle_path(&stack, dep)),
                        Color::Black => {}
                        Color::White => {
                            if (self.dependencies_of)(dep).is_some() {
                                self.colors.insert(dep, Color::Gray);
                                stack.push((dep, 0));
                            }
                        }
                    }
                }
                None => {
                    stack.pop();
                    self.colors.insert(node, Color::Black);
                    finished(node);
                }
            }
        }

        Ok(())
    }
}

/// Builds `repeated -> ... -> repeated` from the gray part of the stack
fn cycle_path(stack: &[(&TaskId, usize)], repeated: &TaskId) -> Vec<TaskId> {
    let start = stack
        .iter()
        .position(|(id, _)| *id == repeated)
        .unwrap_or(0);

    stack[start..]
        .iter()
        .map(|(id, _)| (*id).clone())
        .chain(iter::once(repeated.clone()))
        .collect()
}

/// Borrowed view of the registered tasks as a dependency graph
#[derive(Debug, Clone, Copy)]
pub struct DependencyGraph<'a> {
    tasks: &'a [Task],
    index: &'a HashMap<TaskId, usize>,
}

impl<'a> DependencyGraph<'a> {
    pub(crate) fn new(tasks: &'a [Task], index: &'a HashMap<TaskId, usize>) -> Self {
        Self { tasks, index }
    }

    /// Looks up a registered task
    pub fn task(&self, id: &str) -> Option<&'a Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    /// Returns the dependency list of a registered task
    pub fn dependencies(&self, id: &str) -> Option<&'a [TaskId]> {
        self.task(id).map(|task| task.dependencies.as_slice())
    }

    /// Returns the registered tasks that list `id` as a dependency
    pub fn dependents(&self, id: &str) -> Vec<&'a Task> {
        self.tasks
            .iter()
            .filter(|task| task.dependencies.iter().any(|dep| dep.as_str() == id))
            .collect()
    }

    /// Checks whether registering `candidate` would close a cycle
    ///
    /// The candidate is not part of the graph yet; its own ID resolves to its
    /// own dependency list. Returns the offending path, e.g. `[T2, T1, T2]`.
    pub fn find_cycle_with<'b>(&self, candidate: &'b Task) -> Option<Vec<TaskId>>
    where
        'a: 'b,
    {
        let graph = *self;
        let mut walker = DepthFirst::new(|id: &TaskId| -> Option<&'b [TaskId]> {
            if *id == candidate.id {
                Some(candidate.dependencies.as_slice())
            } else {
                graph.dependencies(id.as_str())
            }
        });

        walker.visit(&candidate.id, |_| {}).err()
    }

    /// Returns every task that is not completed, dependencies first
    ///
    /// Completed tasks are still walked through, so an ordering constraint
    /// that passes through a completed task is kept; they are just left out
    /// of the result. Unknown dependency IDs are ignored. Roots are visited in
    /// registration order, so the result is deterministic.
    pub fn execution_order(&self) -> Result<Vec<&'a Task>, TaskError> {
        let graph = *self;
        let mut walker = DepthFirst::new(|id: &TaskId| graph.dependencies(id.as_str()));
        let mut order = Vec::with_capacity(self.tasks.len());

        for task in self.tasks {
            walker
                .visit(&task.id, |id| {
                    if let Some(task) = graph.task(id.as_str()) {
                        if !task.status().is_complete() {
                            order.push(task);
                        }
                    }
                })
                .map_err(TaskError::CircularDependency)?;
        }

        Ok(order)
    }

    /// Renders the graph in Graphviz DOT format
    ///
    /// Edges run from a dependency to the task waiting on it. Dependencies on
    /// unregistered tasks are left out.
    pub fn to_dot(&self) -> String {
        let mut graph: DiGraph<&str, &str> = DiGraph::new();
        let mut nodes: HashMap<&TaskId, NodeIndex> = HashMap::new();

        for task in self.tasks {
            nodes.insert(&task.id, graph.add_node(task.id.as_str()));
        }

        for task in self.tasks {
            let to = nodes[&task.id];
            for dep in &task.dependencies {
                if let Some(&from) = nodes.get(dep) {
                    graph.update_edge(from, to, "");
                }
            }
        }

        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}
