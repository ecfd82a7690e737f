//! Property tests for the scheduler over randomly generated task graphs

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use taskrank::{Priority, Task, TaskError, TaskId, TaskRegistry, TaskStatus};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 5, 4)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn id(s: &str) -> TaskId {
    TaskId::new(s).unwrap()
}

fn name(i: usize) -> String {
    format!("task_{}", i)
}

#[derive(Debug, Clone)]
struct Planned {
    priority: Priority,
    due_in_hours: i64,
    status: TaskStatus,
    deps: Vec<usize>,
}

// Acyclic by construction: task i may only depend on tasks 0..i.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Planned>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            (
                0..4usize,
                -200i64..400,
                0..4usize,
                proptest::collection::vec(any::<usize>(), 0..4),
            ),
            num_tasks,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (priority, due_in_hours, status, potential))| {
                    let mut deps: Vec<usize> = if i == 0 {
                        Vec::new()
                    } else {
                        potential.into_iter().map(|d| d % i).collect()
                    };
                    deps.sort_unstable();
                    deps.dedup();
                    Planned {
                        priority: Priority::ALL[priority],
                        due_in_hours,
                        status: TaskStatus::ALL[status],
                        deps,
                    }
                })
                .collect()
        })
    })
}

fn build_task(i: usize, plan: &Planned) -> Task {
    Task::new(
        id(&name(i)),
        name(i),
        plan.priority,
        now() + Duration::hours(plan.due_in_hours),
    )
    .with_dependencies(plan.deps.iter().map(|d| id(&name(*d))))
}

fn build_registry(planned: &[Planned]) -> TaskRegistry {
    let mut registry =
        TaskRegistry::from_tasks(planned.iter().enumerate().map(|(i, s)| build_task(i, s))).unwrap();
    for (i, plan) in planned.iter().enumerate() {
        registry.update_status(&name(i), plan.status).unwrap();
    }
    registry
}

proptest! {
    #[test]
    fn order_is_a_dependency_respecting_permutation(planned in dag_strategy(30)) {
        let registry = build_registry(&planned);
        let order = registry.execution_order().unwrap();

        let expected: usize = planned
            .iter()
            .filter(|s| !s.status.is_complete())
            .count();
        prop_assert_eq!(order.len(), expected);

        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(at, task)| (task.id.as_str(), at))
            .collect();
        prop_assert_eq!(position.len(), order.len());

        for task in &order {
            prop_assert!(!task.status().is_complete());
            for dep in &task.dependencies {
                if let Some(dep_at) = position.get(dep.as_str()) {
                    prop_assert!(*dep_at < position[task.id.as_str()]);
                }
            }
        }
    }

    #[test]
    fn executable_tasks_are_exactly_the_unblocked_pending_ones(planned in dag_strategy(30)) {
        let registry = build_registry(&planned);
        let ready = registry.executable_tasks(now());

        let mut expected: Vec<&str> = registry
            .iter()
            .filter(|task| task.status() == TaskStatus::Pending)
            .filter(|task| {
                task.dependencies.iter().all(|dep| {
                    registry
                        .find_by_id(dep.as_str())
                        .map(|d| d.status() == TaskStatus::Completed)
                        .unwrap_or(false)
                })
            })
            .map(|task| task.id.as_str())
            .collect();
        let mut actual: Vec<&str> = ready.iter().map(|task| task.id.as_str()).collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);

        for pair in ready.windows(2) {
            prop_assert!(pair[0].urgency_score(now()) >= pair[1].urgency_score(now()));
        }
    }

    #[test]
    fn closing_a_cycle_is_rejected_without_side_effects(
        planned in dag_strategy(20),
        pick in any::<usize>(),
    ) {
        let holder = pick % planned.len();
        let tasks: Vec<Task> = planned
            .iter()
            .enumerate()
            .map(|(i, plan)| {
                let task = build_task(i, plan);
                if i == holder {
                    task.depends_on(id("ghost"))
                } else {
                    task
                }
            })
            .collect();
        let mut registry = TaskRegistry::from_tasks(tasks).unwrap();
        let before: Vec<String> = registry
            .execution_order()
            .unwrap()
            .iter()
            .map(|task| task.id.to_string())
            .collect();

        let ghost = Task::new(id("ghost"), "ghost", Priority::Low, now())
            .depends_on(id(&name(holder)));
        let err = registry.insert(ghost).unwrap_err();

        match err {
            TaskError::CircularDependency(path) => {
                prop_assert!(path.len() >= 2);
                prop_assert_eq!(path.first(), path.last());
                prop_assert!(path.iter().any(|p| p.as_str() == "ghost"));
            }
            other => prop_assert!(false, "unexpected error: {}", other),
        }

        prop_assert_eq!(registry.len(), planned.len());
        prop_assert!(!registry.contains("ghost"));
        let after: Vec<String> = registry
            .execution_order()
            .unwrap()
            .iter()
            .map(|task| task.id.to_string())
            .collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn urgency_is_monotonic(
        due_in_hours in -500i64..500,
        earlier_by in 0i64..200,
        priority in 0..3usize,
    ) {
        let deadline = now() + Duration::hours(due_in_hours);
        let lower = Priority::ALL[priority];
        let higher = Priority::ALL[priority + 1];

        let later = Task::new(id("a"), "a", lower, deadline);
        let sooner = Task::new(id("b"), "b", lower, deadline - Duration::hours(earlier_by));
        prop_assert!(sooner.urgency_score(now()) >= later.urgency_score(now()));

        let more_important = Task::new(id("c"), "c", higher, deadline);
        prop_assert!(more_important.urgency_score(now()) > later.urgency_score(now()));
    }
}
