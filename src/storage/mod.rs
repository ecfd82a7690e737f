//! # Storage Layer
//!
//! Persistence for taskrank using plain, diff-friendly files.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one JSON per line, registration order) | `.taskrank/tasks.jsonl` |
//! | Config | TOML | `.taskrank/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`TaskStore`] uses file locking (`fs2`) for concurrent access
//! - Full rewrites are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a taskrank project
//! - [`TaskStore`] - Read/write tasks as JSONL
//! - [`Config`] - Project and global configuration

mod jsonl;
mod config;
mod project;

pub use jsonl::TaskStore;
pub use config::{Config, ConfigError, GlobalConfig, ProjectConfig};
pub use project::{Project, ProjectError};
