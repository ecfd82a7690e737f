//! Project statistics

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

use super::output::Output;
use crate::domain::{Priority, TaskRegistry, TaskStatus};
use crate::storage::Project;

/// Counts by status
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub blocked: usize,
}

/// Counts by priority
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub urgent: usize,
}

/// Summary of the registry at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
    pub executable: usize,
    pub overdue: usize,
    pub estimated_hours: f64,
    pub remaining_hours: f64,
    pub completion_percent: f64,
}

impl TaskStats {
    pub fn collect(registry: &TaskRegistry, now: NaiveDateTime) -> Self {
        let mut by_status = StatusCounts::default();
        let mut by_priority = PriorityCounts::default();
        let mut estimated_hours = 0.0;
        let mut remaining_hours = 0.0;

        for task in registry {
            match task.status() {
                TaskStatus::Pending => by_status.pending += 1,
                TaskStatus::InProgress => by_status.in_progress += 1,
                TaskStatus::Completed => by_status.completed += 1,
                TaskStatus::Blocked => by_status.blocked += 1,
            }
            match task.priority {
                Priority::Low => by_priority.low += 1,
                Priority::Medium => by_priority.medium += 1,
                Priority::High => by_priority.high += 1,
                Priority::Urgent => by_priority.urgent += 1,
            }

            estimated_hours += task.estimated_hours;
            if !task.status().is_complete() {
                remaining_hours += task.estimated_hours;
            }
        }

        let total = registry.len();
        let completion_percent = if total == 0 {
            0.0
        } else {
            by_status.completed as f64 * 100.0 / total as f64
        };

        Self {
            total,
            executable: registry.executable_tasks(now).len(),
            overdue: registry.overdue_tasks(now).len(),
            by_status,
            by_priority,
            estimated_hours,
            remaining_hours,
            completion_percent,
        }
    }
}

/// Prints project statistics
pub fn run(output: &Output, now: NaiveDateTime) -> Result<()> {
    let project = Project::open_current()?;
    let registry = project.load_registry()?;
    let stats = TaskStats::collect(&registry, now);

    if output.is_json() {
        output.data(&stats);
        return Ok(());
    }

    println!("Project: {}", project.root().display());
    println!();
    println!(
        "Tasks: {} total, {:.0}% complete",
        stats.total, stats.completion_percent
    );
    println!("  Pending:      {}", stats.by_status.pending);
    println!("  In progress:  {}", stats.by_status.in_progress);
    println!("  Blocked:      {}", stats.by_status.blocked);
    println!("  Completed:    {}", stats.by_status.completed);
    println!();
    println!("Priority:");
    println!("  Urgent: {}", stats.by_priority.urgent);
    println!("  High:   {}", stats.by_priority.high);
    println!("  Medium: {}", stats.by_priority.medium);
    println!("  Low:    {}", stats.by_priority.low);
    println!();
    println!("Ready to start: {}", stats.executable);
    println!("Overdue:        {}", stats.overdue);
    if stats.estimated_hours > 0.0 {
        println!(
            "Effort:         {:.1}h remaining of {:.1}h",
            stats.remaining_hours, stats.estimated_hours
        );
    }

    Ok(())
}
