//! Main CLI application structure

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::rank::{self, RankArgs};
use super::task;
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "taskrank")]
#[command(author, version, about = "Rank tasks by priority and find circular dependencies")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

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

    /// Manage the project's stored tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Score a batch and list every task, highest priority first
    Analyze {
        /// Batch file (.json, .jsonl, .yaml) or '-' for stdin; stored tasks when omitted
        file: Option<String>,

        /// Strategy: fastest_wins, high_impact, deadline_driven, smart_balance
        #[arg(long, short, env = "TASKRANK_STRATEGY")]
        strategy: Option<String>,

        /// Reference date for urgency (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Show the top tasks to work on next
    Suggest {
        /// Batch file (.json, .jsonl, .yaml) or '-' for stdin; stored tasks when omitted
        file: Option<String>,

        /// Strategy: fastest_wins, high_impact, deadline_driven, smart_balance
        #[arg(long, short, env = "TASKRANK_STRATEGY")]
        strategy: Option<String>,

        /// Reference date for urgency (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Number of suggestions (defaults to suggest_limit in config)
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
    },

    /// Show circular dependencies in a batch
    Cycles {
        /// Batch file (.json, .jsonl, .yaml) or '-' for stdin; stored tasks when omitted
        file: Option<String>,
    },

    /// List the available strategies and their weights
    Strategies,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose("taskrank starting");
    match &config.project_root {
        Some(root) => output.verbose_ctx("config", &format!("Project root: {}", root.display())),
        None => output.verbose_ctx("config", "Not in a project, using defaults"),
    }

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .taskrank directory at: {}", project.project_dir().display()),
            );
            output.success(&format!(
                "Initialized taskrank project at {}",
                project.root().display()
            ));
        }

        Commands::Task(cmd) => task::run(cmd, &output)?,

        Commands::Analyze {
            file,
            strategy,
            today,
        } => {
            let args = RankArgs {
                file: file.as_deref(),
                strategy: strategy.as_deref(),
                today,
            };
            rank::analyze(&output, &config, args)?
        }

        Commands::Suggest {
            file,
            strategy,
            today,
            limit,
        } => {
            let args = RankArgs {
                file: file.as_deref(),
                strategy: strategy.as_deref(),
                today,
            };
            let limit = limit.map(|n| usize::try_from(n).unwrap_or(usize::MAX));
            rank::suggest(&output, &config, args, limit)?
        }

        Commands::Cycles { file } => rank::cycles(&output, file.as_deref())?,

        Commands::Strategies => rank::strategies(&output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
