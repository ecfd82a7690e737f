//! Configuration handling for taskrank
//!
//! Configuration is stored in `.taskrank/config.toml` (project) and
//! `~/.config/taskrank/config.toml` (global). Set `TASKRANK_CONFIG_DIR` to
//! point the global lookup somewhere else.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::domain::Priority;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Priority for `taskrank task add` when none is given
    pub default_priority: Priority,

    /// Deadline offset in hours for `taskrank task add` when none is given
    pub default_deadline_hours: u32,

    /// Number of tasks shown by `taskrank rank`
    pub top: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_priority: Priority::Medium,
            default_deadline_hours: 72,
            top: 5,
        }
    }
}

impl ProjectConfig {
    /// Rejects values the commands cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_deadline_hours == 0 {
            return Err(ConfigError::Invalid(
                "default_deadline_hours must be at least 1".to_string(),
            ));
        }
        if self.top == 0 {
            return Err(ConfigError::Invalid("top must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self { project, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("TASKRANK_CONFIG_DIR") {
            return Some(PathBuf::from(dir));
        }
        ProjectDirs::from("dev", "taskrank", "taskrank").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    ///
    /// Does not look at any project, so it works from anywhere.
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        debug!(path = %config_path.display(), "loading global config");
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(".taskrank").join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        debug!(path = %config_path.display(), "loading project config");
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config
            .validate()
            .with_context(|| format!("In {}", config_path.display()))?;

        Ok(config)
    }

    /// Finds the project root by looking for a `.taskrank/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(".taskrank").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}
