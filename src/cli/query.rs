//! Query commands (ready, order, overdue, rank, next, graph)
//!
//! Each command loads the store into a registry and asks it one question.

use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::debug;

use super::output::{task_json, Output};
use crate::storage::Project;

/// Show tasks that can be started now, most urgent first
pub fn ready(output: &Output, now: NaiveDateTime) -> Result<()> {
    let project = Project::open_current()?;
    let registry = project.load_registry()?;

    let ready = registry.executable_tasks(now);
    debug!(count = ready.len(), "executable tasks");

    output.tasks("Ready tasks", &ready, now, "No tasks ready to work on.");
    Ok(())
}

/// Show every incomplete task in dependency order
pub fn order(output: &Output, now: NaiveDateTime) -> Result<()> {
    let project = Project::open_current()?;
    let registry = project.load_registry()?;

    let order = registry.execution_order()?;

    if output.is_json() {
        output.tasks("Execution order", &order, now, "");
        return Ok(());
    }

    if order.is_empty() {
        println!("Nothing left to do.");
        return Ok(());
    }

    println!("Execution order ({}):", order.len());
    for (step, task) in order.iter().enumerate() {
        let waiting = registry.unmet_dependencies(task);
        let note = if waiting.is_empty() {
            String::new()
        } else {
            let names: Vec<_> = waiting.iter().map(|id| id.as_str()).collect();
            format!("  (after {})", names.join(", "))
        };
        println!(
            "{:>3}. {} {:<20} {}{}",
            step + 1,
            task.status().marker(),
            task.id,
            task.title,
            note
        );
    }

    Ok(())
}

/// Show incomplete tasks past their deadline
pub fn overdue(output: &Output, now: NaiveDateTime) -> Result<()> {
    let project = Project::open_current()?;
    let registry = project.load_registry()?;

    let overdue = registry.overdue_tasks(now);
    output.tasks("Overdue tasks", &overdue, now, "No overdue tasks.");
    Ok(())
}

/// Show incomplete tasks ranked by urgency
///
/// `top` falls back to the project configuration.
pub fn rank(output: &Output, now: NaiveDateTime, top: Option<usize>) -> Result<()> {
    let project = Project::open_current()?;
    let registry = project.load_registry()?;
    let limit = top.unwrap_or(project.config().project.top);

    let mut ranked = registry.ranked_by_urgency(now);
    ranked.truncate(limit);

    output.tasks("Most urgent", &ranked, now, "No open tasks.");
    Ok(())
}

/// Recommend the single most urgent task that can be started
pub fn next(output: &Output, now: NaiveDateTime) -> Result<()> {
    let project = Project::open_current()?;
    let registry = project.load_registry()?;

    let recommendation = registry.recommend_next(now);

    if output.is_json() {
        let value = recommendation
            .map(|task| task_json(task, now))
            .unwrap_or(serde_json::Value::Null);
        output.data(&value);
        return Ok(());
    }

    match recommendation {
        Some(task) => {
            println!("Next: {} - {}", task.id, task.title);
            println!(
                "  {} priority, due {} (score {})",
                task.priority,
                task.deadline.format("%Y-%m-%d %H:%M"),
                task.urgency_score(now)
            );
            if task.is_overdue(now) {
                println!("  This task is overdue.");
            }
        }
        None if registry.ranked_by_urgency(now).is_empty() => {
            println!("Nothing left to do.");
        }
        None => {
            println!("No task can be started: every open task is waiting on another.");
        }
    }

    Ok(())
}

/// Print the dependency graph in Graphviz DOT format
pub fn graph(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let registry = project.load_registry()?;

    let dot = registry.graph().to_dot();

    if output.is_json() {
        output.data(&serde_json::json!({ "dot": dot }));
    } else {
        print!("{}", dot);
    }

    Ok(())
}
