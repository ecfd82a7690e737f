//! Task CLI commands

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use clap::Subcommand;
use tracing::debug;

use super::output::{task_json, Output};
use super::when::parse_when;
use crate::domain::{Priority, Task, TaskError, TaskId, TaskStatus};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    ///
    /// Examples:
    ///   taskrank task add "Design schema" --id schema --priority high --deadline +2d
    ///   taskrank task add "Build API" --depends-on schema --deadline "2026-06-01 17:00"
    Add {
        /// Task title
        title: String,

        /// Task ID (generated from the title when omitted)
        #[arg(long)]
        id: Option<TaskId>,

        /// Priority: low, medium, high, urgent or 1-4
        #[arg(long, short)]
        priority: Option<Priority>,

        /// Deadline: YYYY-MM-DD[ HH:MM] or +N[m|h|d|w]
        #[arg(long, short)]
        deadline: Option<String>,

        /// Estimated effort in hours
        #[arg(long, short, default_value = "0")]
        estimate: f64,

        /// IDs of tasks that must be completed first (comma separated)
        #[arg(long = "depends-on", value_delimiter = ',')]
        depends_on: Vec<TaskId>,

        /// Longer description
        #[arg(long)]
        description: Option<String>,
    },

    /// List tasks in registration order
    List {
        /// Only tasks with this status
        #[arg(long, short)]
        status: Option<TaskStatus>,

        /// Only tasks with this priority
        #[arg(long, short)]
        priority: Option<Priority>,
    },

    /// Show task details
    Show {
        /// Task ID
        id: String,
    },

    /// Mark task as in progress
    Start {
        /// Task ID
        id: String,
    },

    /// Mark task as completed
    Done {
        /// Task ID
        id: String,
    },

    /// Mark task as blocked
    Block {
        /// Task ID
        id: String,
    },

    /// Move task back to pending
    Reopen {
        /// Task ID
        id: String,
    },
}

pub fn run(cmd: TaskCommands, output: &Output, now: NaiveDateTime) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            title,
            id,
            priority,
            deadline,
            estimate,
            depends_on,
            description,
        } => {
            let request = AddRequest {
                title,
                id,
                priority,
                deadline,
                estimate,
                depends_on,
                description,
            };
            add_task(output, now, request)
        }
        TaskCommands::List { status, priority } => list_tasks(output, now, status, priority),
        TaskCommands::Show { id } => show_task(output, now, &id),
        TaskCommands::Start { id } => set_status(output, &id, TaskStatus::InProgress),
        TaskCommands::Done { id } => set_status(output, &id, TaskStatus::Completed),
        TaskCommands::Block { id } => set_status(output, &id, TaskStatus::Blocked),
        TaskCommands::Reopen { id } => set_status(output, &id, TaskStatus::Pending),
    }
}

struct AddRequest {
    title: String,
    id: Option<TaskId>,
    priority: Option<Priority>,
    deadline: Option<String>,
    estimate: f64,
    depends_on: Vec<TaskId>,
    description: Option<String>,
}

fn add_task(output: &Output, now: NaiveDateTime, request: AddRequest) -> Result<()> {
    let project = Project::open_current()?;
    let defaults = &project.config().project;
    let mut registry = project.load_registry()?;

    let deadline = match request.deadline.as_deref() {
        Some(raw) => parse_when(raw, now)?,
        None => now
            .checked_add_signed(Duration::hours(i64::from(defaults.default_deadline_hours)))
            .context("Default deadline is out of range")?,
    };
    let priority = request.priority.unwrap_or(defaults.default_priority);
    // Hash the real clock so a pinned --now cannot produce repeat IDs
    let id = request
        .id
        .unwrap_or_else(|| TaskId::generate(&request.title, Local::now().naive_local()));

    let task = Task::new(id.clone(), request.title, priority, deadline)
        .with_description(request.description.unwrap_or_default())
        .with_estimated_hours(request.estimate)
        .with_dependencies(request.depends_on)
        .with_created_at(now);

    debug!(id = %id, deps = task.dependencies.len(), "inserting task");
    registry.insert(task)?;

    let task = registry
        .find_by_id(id.as_str())
        .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))?;
    project.task_store().append(task)?;

    if output.is_json() {
        output.data(&task_json(task, now));
    } else {
        output.success(&format!("Created task: {} - {}", task.id, task.title));
        let unmet = registry.unmet_dependencies(task);
        if !unmet.is_empty() {
            let names: Vec<_> = unmet.iter().map(|id| id.as_str()).collect();
            println!("  waiting on: {}", names.join(", "));
        }
    }

    Ok(())
}

fn list_tasks(
    output: &Output,
    now: NaiveDateTime,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
) -> Result<()> {
    let project = Project::open_current()?;
    let registry = project.load_registry()?;

    let mut tasks = match priority {
        Some(priority) => registry.tasks_by_priority(priority),
        None => registry.iter().collect(),
    };
    if let Some(status) = status {
        tasks.retain(|task| task.status() == status);
    }

    output.tasks("Tasks", &tasks, now, "No tasks found.");
    Ok(())
}

fn show_task(output: &Output, now: NaiveDateTime, id: &str) -> Result<()> {
    let project = Project::open_current()?;
    let registry = project.load_registry()?;

    let task = registry
        .find_by_id(id)
        .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))?;
    let unmet = registry.unmet_dependencies(task);
    let dependents = registry.dependents(id);

    if output.is_json() {
        let mut json = task_json(task, now);
        json["description"] = serde_json::json!(task.description);
        json["created_at"] = serde_json::json!(task.created_at);
        json["unmet_dependencies"] = serde_json::json!(unmet);
        json["dependents"] = serde_json::json!(dependents
            .iter()
            .map(|t| t.id.as_str())
            .collect::<Vec<_>>());
        output.data(&json);
        return Ok(());
    }

    println!("{} {}", task.status().marker(), task.title);
    println!("  ID:         {}", task.id);
    println!("  Status:     {}", task.status());
    println!("  Priority:   {} ({})", task.priority, task.priority.value());
    println!(
        "  Deadline:   {} ({}h left{})",
        task.deadline.format("%Y-%m-%d %H:%M"),
        task.hours_until_deadline(now),
        if task.is_overdue(now) { ", overdue" } else { "" }
    );
    println!("  Urgency:    {}", task.urgency_score(now));
    if task.estimated_hours > 0.0 {
        println!("  Estimate:   {}h", task.estimated_hours);
    }
    println!("  Created:    {}", task.created_at.format("%Y-%m-%d %H:%M"));

    if !task.description.is_empty() {
        println!();
        println!("  {}", task.description);
    }

    if !task.dependencies.is_empty() {
        println!();
        println!("  Depends on:");
        for dep in &task.dependencies {
            let state = match registry.find_by_id(dep.as_str()) {
                Some(found) => found.status().marker(),
                None => "[?]",
            };
            println!("    {} {}", state, dep);
        }
    }

    if !dependents.is_empty() {
        println!();
        println!("  Needed by:");
        for dependent in &dependents {
            println!("    {} {}", dependent.status().marker(), dependent.id);
        }
    }

    if task.status().is_pending() && unmet.is_empty() {
        println!();
        println!("  Ready to start.");
    }

    Ok(())
}

fn set_status(output: &Output, id: &str, status: TaskStatus) -> Result<()> {
    let project = Project::open_current()?;
    let mut registry = project.load_registry()?;

    registry.update_status(id, status)?;
    project.save_registry(&registry)?;
    debug!(id, %status, "status updated");

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "status": status,
        }));
    } else {
        output.success(&format!("Task {} is now {}", id, status));
    }

    Ok(())
}
