//! Sample project data
//!
//! A small release plan with chained dependencies, one task already running
//! late, one finished task and one unrelated chore.

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDateTime};

use super::output::Output;
use crate::domain::{Priority, Task, TaskId, TaskRegistry, TaskStatus};
use crate::storage::Project;

struct SampleTask {
    id: &'static str,
    title: &'static str,
    priority: Priority,
    due_in_hours: i64,
    estimate: f64,
    dependencies: &'static [&'static str],
    status: TaskStatus,
}

const SAMPLE: [SampleTask; 8] = [
    SampleTask {
        id: "design-schema",
        title: "Design database schema",
        priority: Priority::High,
        due_in_hours: -6,
        estimate: 4.0,
        dependencies: &[],
        status: TaskStatus::InProgress,
    },
    SampleTask {
        id: "setup-ci",
        title: "Set up CI pipeline",
        priority: Priority::Medium,
        due_in_hours: 48,
        estimate: 2.0,
        dependencies: &[],
        status: TaskStatus::Completed,
    },
    SampleTask {
        id: "implement-api",
        title: "Implement REST API",
        priority: Priority::Urgent,
        due_in_hours: 24,
        estimate: 12.0,
        dependencies: &["design-schema"],
        status: TaskStatus::Pending,
    },
    SampleTask {
        id: "write-tests",
        title: "Write integration tests",
        priority: Priority::High,
        due_in_hours: 72,
        estimate: 6.0,
        dependencies: &["implement-api", "setup-ci"],
        status: TaskStatus::Pending,
    },
    SampleTask {
        id: "update-docs",
        title: "Update API documentation",
        priority: Priority::Low,
        due_in_hours: 240,
        estimate: 3.0,
        dependencies: &["implement-api"],
        status: TaskStatus::Pending,
    },
    SampleTask {
        id: "security-review",
        title: "Security review",
        priority: Priority::High,
        due_in_hours: 96,
        estimate: 4.0,
        dependencies: &["implement-api"],
        status: TaskStatus::Pending,
    },
    SampleTask {
        id: "release",
        title: "Release v1.0",
        priority: Priority::Urgent,
        due_in_hours: 120,
        estimate: 1.0,
        dependencies: &["write-tests", "update-docs", "security-review"],
        status: TaskStatus::Pending,
    },
    SampleTask {
        id: "team-retro",
        title: "Schedule team retrospective",
        priority: Priority::Low,
        due_in_hours: 12,
        estimate: 0.5,
        dependencies: &[],
        status: TaskStatus::Pending,
    },
];

/// Builds the sample tasks with deadlines relative to `now`
///
/// Statuses are applied afterwards through the registry, see
/// [`sample_registry`].
pub fn sample_tasks(now: NaiveDateTime) -> Result<Vec<Task>> {
    SAMPLE
        .iter()
        .map(|sample| -> Result<Task> {
            let deps = sample
                .dependencies
                .iter()
                .map(|dep| TaskId::new(*dep))
                .collect::<Result<Vec<_>, _>>()?;
            let deadline = now
                .checked_add_signed(Duration::hours(sample.due_in_hours))
                .context("Sample deadline is out of range")?;
            let task = Task::new(TaskId::new(sample.id)?, sample.title, sample.priority, deadline)
            .with_estimated_hours(sample.estimate)
            .with_dependencies(deps)
            .with_created_at(now);
            Ok(task)
        })
        .collect()
}

/// Registers the sample tasks and applies their statuses
pub fn sample_registry(now: NaiveDateTime) -> Result<TaskRegistry> {
    let mut registry = TaskRegistry::from_tasks(sample_tasks(now)?)?;
    for sample in &SAMPLE {
        if sample.status != TaskStatus::Pending {
            registry.update_status(sample.id, sample.status)?;
        }
    }
    Ok(registry)
}

/// Seeds the current project with the sample data
pub fn run(output: &Output, now: NaiveDateTime, force: bool) -> Result<()> {
    let project = Project::open_current()?;
    let existing = project.load_registry()?;

    if !existing.is_empty() && !force {
        bail!(
            "Project already has {} task(s). Use --force to replace them with the sample data.",
            existing.len()
        );
    }

    let registry = sample_registry(now)?;
    project.save_registry(&registry)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "created": registry.len(),
            "replaced": existing.len(),
        }));
    } else {
        output.success(&format!("Created {} sample tasks", registry.len()));
        if let Some(next) = registry.recommend_next(now) {
            println!("Try 'taskrank next': {} is ready to start", next.id);
        }
    }

    Ok(())
}
