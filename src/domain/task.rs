//! Task domain model
//!
//! A task carries fixed attributes (title, priority, deadline, dependencies)
//! set when it is built, plus a status that only the registry may change.
//! Urgency and overdue checks take the current time as a parameter.

use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use super::error::TaskError;
use super::id::TaskId;

/// Priority of a task, ordered from least to most important
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl Priority {
    /// All priorities, lowest first
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Returns the numeric weight (1-4)
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Decodes a numeric priority
    pub fn from_value(value: u8) -> Result<Self, TaskError> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            4 => Ok(Priority::Urgent),
            other => Err(TaskError::InvalidPriority(other.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl TryFrom<u8> for Priority {
    type Error = TaskError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    /// Accepts either the name (`high`) or the numeric weight (`3`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u8>() {
            return Self::from_value(value);
        }
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(TaskError::InvalidPriority(s.to_string())),
        }
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    /// Set by callers only; never assigned automatically
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Returns true if this task is not yet started
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }

    /// Checkbox-style marker for text listings
    pub fn marker(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "[ ]",
            TaskStatus::InProgress => "[~]",
            TaskStatus::Completed => "[x]",
            TaskStatus::Blocked => "[!]",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" | "todo" => Ok(TaskStatus::Pending),
            "in_progress" | "active" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// A unit of work with a priority, a deadline and dependencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Human-readable title
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub priority: Priority,

    /// Local wall-clock deadline
    pub deadline: NaiveDateTime,

    /// Informational estimate; never used for scheduling
    #[serde(default)]
    pub estimated_hours: f64,

    /// Tasks that must be completed before this one can run.
    /// May name tasks that are not registered (yet).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,

    #[serde(default)]
    status: TaskStatus,

    /// When the task was created
    pub created_at: NaiveDateTime,
}

impl Task {
    /// Creates a pending task with no dependencies
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        priority: Priority,
        deadline: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            priority,
            deadline,
            estimated_hours: 0.0,
            dependencies: Vec::new(),
            status: TaskStatus::Pending,
            created_at: Local::now().naive_local(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the estimate; negative or non-finite values become zero
    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = if hours.is_finite() { hours.max(0.0) } else { 0.0 };
        self
    }

    /// Appends dependencies in the given order
    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies.extend(deps);
        self
    }

    /// Appends a single dependency
    pub fn depends_on(mut self, dep: TaskId) -> Self {
        self.dependencies.push(dep);
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Current status
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Only the registry changes status once a task is registered
    pub(crate) fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Returns true if the deadline has passed and the task is not completed
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        now > self.deadline && !self.status.is_complete()
    }

    /// Whole hours until the deadline, rounded down
    ///
    /// Negative once the deadline has passed: 30 minutes late is -1.
    pub fn hours_until_deadline(&self, now: NaiveDateTime) -> i64 {
        let remaining = self.deadline - now;
        let hours = remaining.num_hours();
        if remaining < Duration::hours(hours) {
            hours - 1
        } else {
            hours
        }
    }

    /// Urgency score: `priority * 10 + max(0, 100 - hours_until_deadline)`
    ///
    /// The deadline term dominates: a low priority task about to expire
    /// outranks an urgent task due next month. The term is not capped, so
    /// overdue tasks keep climbing past 100.
    pub fn urgency_score(&self, now: NaiveDateTime) -> i64 {
        let deadline_term = (100 - self.hours_until_deadline(now)).max(0);
        i64::from(self.priority.value()) * 10 + deadline_term
    }
}

/// Sorts tasks most urgent first
///
/// The sort is stable, so tasks with equal scores keep their relative order.
pub fn sort_by_urgency(tasks: &mut [&Task], now: NaiveDateTime) {
    tasks.sort_by_cached_key(|task| Reverse(task.urgency_score(now)));
}
