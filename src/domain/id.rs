//! Task identifiers
//!
//! IDs are opaque strings chosen by the caller. The only rules are that an ID
//! is non-empty and contains no whitespace or commas, so it can be passed in
//! comma-separated dependency lists on the command line.
//!
//! When no ID is supplied, [`TaskId::generate`] derives one in the format
//! `t-{7-char-hash}` from the title and creation timestamp.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Task ID must not be empty")]
    Empty,

    #[error("Invalid task ID '{0}': whitespace and commas are not allowed")]
    InvalidCharacters(String),
}

/// Generates a 7-character hash from title and timestamp
fn generate_hash(title: &str, timestamp: NaiveDateTime) -> String {
    let nanos = timestamp.and_utc().timestamp_nanos_opt().unwrap_or(0);
    let input = format!("{}{}", title, nanos);
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Unique identifier of a task
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task ID, validating its format
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdError::Empty);
        }
        if id.chars().any(|c| c.is_whitespace() || c == ',') {
            return Err(IdError::InvalidCharacters(id));
        }
        Ok(Self(id))
    }

    /// Derives a fresh `t-{hash}` ID from a title and timestamp
    ///
    /// Same title at different times produces different IDs.
    pub fn generate(title: &str, timestamp: NaiveDateTime) -> Self {
        Self(format!("t-{}", generate_hash(title, timestamp)))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn accepts_arbitrary_opaque_ids() {
        for raw in ["T1", "build-api", "a.b.c", "42"] {
            let id: TaskId = raw.parse().unwrap();
            assert_eq!(id.as_str(), raw);
            assert_eq!(id.to_string(), raw);
        }
    }

    #[test]
    fn trims_surrounding_whitespace_when_parsing() {
        let id: TaskId = "  T1 ".parse().unwrap();
        assert_eq!(id.as_str(), "T1");
    }

    #[test]
    fn rejects_empty_id() {
        assert_eq!(TaskId::new(""), Err(IdError::Empty));
        assert_eq!("   ".parse::<TaskId>(), Err(IdError::Empty));
    }

    #[test]
    fn rejects_whitespace_and_commas() {
        assert!(matches!(
            TaskId::new("two words"),
            Err(IdError::InvalidCharacters(_))
        ));
        assert!(matches!(
            TaskId::new("a,b"),
            Err(IdError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn generated_id_format() {
        let id = TaskId::generate("Write docs", timestamp());
        let s = id.to_string();

        assert!(s.starts_with("t-"));
        assert_eq!(s.len(), 9);
        assert!(s[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_differ_by_timestamp() {
        let first = TaskId::generate("Write docs", timestamp());
        let second = TaskId::generate(
            "Write docs",
            timestamp() + chrono::Duration::milliseconds(1),
        );
        assert_ne!(first, second);
    }

    #[test]
    fn serde_as_plain_string() {
        let id = TaskId::new("T1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"T1\"");

        let parsed: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);

        assert!(serde_json::from_str::<TaskId>("\"\"").is_err());
    }
}
