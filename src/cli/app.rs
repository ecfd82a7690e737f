//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use super::logging::init_logging;
use super::output::{Output, OutputFormat};
use super::when::resolve_now;
use super::{query, sample, stats, task};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "taskrank")]
#[command(author, version, about = "Dependency-aware task scheduling ranked by urgency")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Pin the current time (YYYY-MM-DD[ HH:MM]) for urgency and deadlines
    #[arg(long, global = true, env = "TASKRANK_NOW")]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new taskrank project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Show tasks ready to work on, most urgent first
    Ready,

    /// Show open tasks in an order that respects dependencies
    Order,

    /// Show open tasks past their deadline
    Overdue,

    /// Rank open tasks by urgency
    Rank {
        /// Number of tasks to show (defaults to the project config)
        #[arg(long, short)]
        top: Option<usize>,
    },

    /// Recommend the next task to work on
    Next,

    /// Print the dependency graph in Graphviz DOT format
    Graph,

    /// Show project statistics
    Stats,

    /// Fill the project with sample tasks
    Sample {
        /// Replace existing tasks
        #[arg(long)]
        force: bool,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format,
    };
    let output = Output::new(format);
    let now = resolve_now(cli.now.as_deref())?;
    debug!(%now, ?format, "taskrank starting");

    match cli.command {
        Commands::Init { path } => {
            let project = Project::init(&path)?;
            if output.is_json() {
                output.data(&serde_json::json!({
                    "root": project.root().display().to_string(),
                    "data_dir": project.data_dir().display().to_string(),
                }));
            } else {
                output.success(&format!(
                    "Initialized taskrank project at {}",
                    project.root().display()
                ));
            }
        }

        Commands::Task(cmd) => task::run(cmd, &output, now)?,

        Commands::Ready => query::ready(&output, now)?,
        Commands::Order => query::order(&output, now)?,
        Commands::Overdue => query::overdue(&output, now)?,
        Commands::Rank { top } => query::rank(&output, now, top)?,
        Commands::Next => query::next(&output, now)?,
        Commands::Graph => query::graph(&output)?,

        Commands::Stats => stats::run(&output, now)?,
        Commands::Sample { force } => sample::run(&output, now, force)?,
    }

    debug!("command completed");
    Ok(())
}
