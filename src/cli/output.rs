//! Output formatting for CLI commands

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::Task;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // Callers normally render text themselves; fall back to pretty JSON
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints a list of tasks as a table (text) or an array (JSON)
    pub fn tasks(&self, heading: &str, tasks: &[&Task], now: NaiveDateTime, empty: &str) {
        if self.is_json() {
            let items: Vec<_> = tasks.iter().map(|t| task_json(t, now)).collect();
            self.data(&items);
            return;
        }

        if tasks.is_empty() {
            println!("{}", empty);
            return;
        }

        println!("{} ({}):", heading, tasks.len());
        println!(
            "{:<20} {:<4} {:<8} {:<17} {:>7}  TITLE",
            "ID", "", "PRIORITY", "DEADLINE", "SCORE"
        );
        println!("{}", "-".repeat(80));
        for task in tasks {
            let late = if task.is_overdue(now) { " (overdue)" } else { "" };
            println!(
                "{:<20} {:<4} {:<8} {:<17} {:>7}  {}{}",
                task.id,
                task.status().marker(),
                task.priority,
                task.deadline.format("%Y-%m-%d %H:%M").to_string(),
                task.urgency_score(now),
                task.title,
                late
            );
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

/// JSON view of a task with its time-dependent values resolved at `now`
pub fn task_json(task: &Task, now: NaiveDateTime) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "title": task.title,
        "priority": task.priority,
        "status": task.status(),
        "deadline": task.deadline,
        "hours_until_deadline": task.hours_until_deadline(now),
        "urgency_score": task.urgency_score(now),
        "overdue": task.is_overdue(now),
        "estimated_hours": task.estimated_hours,
        "dependencies": task.dependencies,
    })
}
