//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init`, `stats`, `sample` |
//! | Task | Task lifecycle | `task add`, `task start`, `task done` |
//! | Query | Scheduling questions | `ready`, `order`, `overdue`, `rank`, `next` |
//! | Export | Graph output | `graph` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Time
//!
//! Urgency and overdue checks use the local clock. Pass `--now` (or set
//! `TASKRANK_NOW`) to evaluate the schedule at another point in time:
//! ```bash
//! taskrank --now "2026-06-01 09:00" rank
//! ```
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logs on stderr, or set `TASKRANK_LOG`.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod logging;
mod output;
mod query;
mod sample;
mod stats;
mod task;
mod when;

pub use app::{run, Cli, Commands};
pub use output::{task_json, Output, OutputFormat};
pub use sample::{sample_registry, sample_tasks};
pub use stats::TaskStats;
pub use when::parse_when;
