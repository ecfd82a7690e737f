//! Project management
//!
//! Handles project initialization and provides access to the task store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

use super::{Config, TaskStore};
use crate::domain::TaskRegistry;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a taskrank project. Run 'taskrank init' first.")]
    NotInProject,
}

/// A taskrank project: a directory containing `.taskrank/`
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".taskrank").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Safe to run twice: existing files are left alone.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(".taskrank");

        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create .taskrank directory: {}", data_dir.display())
        })?;

        // Create default config
        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# taskrank configuration

# Priority used by 'taskrank task add' without --priority (low, medium, high, urgent)
default_priority = "medium"

# Deadline used by 'taskrank task add' without --deadline, in hours from now
default_deadline_hours = 72

# Number of tasks shown by 'taskrank rank'
top = 5
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let store_path = data_dir.join("tasks.jsonl");
        if !store_path.exists() {
            fs::write(&store_path, "")
                .with_context(|| format!("Failed to create task store: {}", store_path.display()))?;
        }

        info!(root = %root.display(), "initialized project");
        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .taskrank directory path
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".taskrank")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the task store
    pub fn task_store(&self) -> TaskStore {
        TaskStore::for_project(&self.root)
    }

    /// Loads every stored task into a registry
    pub fn load_registry(&self) -> Result<TaskRegistry> {
        self.task_store().load_registry()
    }

    /// Rewrites the task store from a registry
    pub fn save_registry(&self, registry: &TaskRegistry) -> Result<()> {
        self.task_store().write_all(registry)
    }
}
