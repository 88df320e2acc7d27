//! Task CLI commands

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{
    is_temporary, new_task_id, parse_due_date, DependencyGraph, Task, TEMP_ID_PREFIX,
};
use crate::storage::Project;

/// Parses a `--due` value with the same rules as batch records
fn parse_due_arg(value: &str) -> Result<NaiveDate, String> {
    parse_due_date(value).ok_or_else(|| format!("not an ISO-8601 date: '{}'", value))
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to the project's task list
    ///
    /// Examples:
    ///   taskrank task add "Fix typo" --hours 0.5
    ///   taskrank task add "Ship release" --due 2025-12-01 --importance 9 --depends-on t-1a2b3c4
    Add {
        /// Task title
        title: String,

        /// Explicit task ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_due_arg)]
        due: Option<NaiveDate>,

        /// Estimated effort in hours
        #[arg(long, default_value_t = crate::domain::DEFAULT_ESTIMATED_HOURS)]
        hours: f64,

        /// Importance from 1 (low) to 10 (critical)
        #[arg(long, default_value_t = crate::domain::DEFAULT_IMPORTANCE)]
        importance: i64,

        /// ID of a task this one depends on (repeatable)
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
    },

    /// List stored tasks in the order they were added
    List,

    /// Remove a task
    Remove {
        /// Task ID
        id: String,
    },
}

pub fn run(cmd: TaskCommands, output: &Output) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            title,
            id,
            due,
            hours,
            importance,
            depends_on,
        } => {
            let mut task = Task::new(
                id.unwrap_or_else(|| new_task_id(&title, Utc::now())),
                title,
            )
            .with_hours(hours)
            .with_importance(importance);
            if let Some(due) = due {
                task = task.with_due_date(due);
            }
            let task = depends_on
                .into_iter()
                .fold(task, |task, dep| task.with_dependency(dep));
            add_task(output, task)
        }
        TaskCommands::List => list_tasks(output),
        TaskCommands::Remove { id } => remove_task(output, &id),
    }
}

fn add_task(output: &Output, task: Task) -> Result<()> {
    if task.id.trim().is_empty() {
        anyhow::bail!("Task ID must not be empty");
    }
    if is_temporary(&task.id) {
        anyhow::bail!("Task ID must not start with '{}'", TEMP_ID_PREFIX);
    }

    let project = Project::open_current()?;
    let store = project.task_store();
    let existing = store.read_all()?;

    if existing.iter().any(|t| t.id == task.id) {
        anyhow::bail!("Task already exists: {}", task.id);
    }

    let graph = DependencyGraph::from_tasks(existing.iter().chain([&task]));
    let known = graph.dependencies(&task.id);
    for dep in task.dependencies.iter().filter(|d| !known.contains(&d.as_str())) {
        output.verbose_ctx("task", &format!("Dependency {} is not a stored task", dep));
    }
    if graph.find_cycles().members().contains(task.id.as_str()) {
        output.warning(&format!("{} is part of a circular dependency", task.id));
    }

    store.append(&task)?;
    output.verbose_ctx("task", &format!("Appended to {}", store.path().display()));

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Created task: {} - {}", task.id, task.title));
    }

    Ok(())
}

fn list_tasks(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;

    if output.is_json() {
        output.data(&tasks);
    } else if tasks.is_empty() {
        println!("No tasks");
    } else {
        println!(
            "{:<20} {:<10} {:>6} {:>4}  {:<20} TITLE",
            "ID", "DUE", "HOURS", "IMP", "DEPENDS ON"
        );
        println!("{}", "-".repeat(80));

        for task in &tasks {
            let due = task
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            let hours = task
                .estimated_hours
                .map(|h| h.to_string())
                .unwrap_or_else(|| "-".to_string());
            let importance = task
                .importance
                .map(|i| i.to_string())
                .unwrap_or_else(|| "-".to_string());
            let deps = if task.dependencies.is_empty() {
                "-".to_string()
            } else {
                task.dependencies.join(",")
            };
            println!(
                "{:<20} {:<10} {:>6} {:>4}  {:<20} {}",
                task.id, due, hours, importance, deps, task.title
            );
        }
    }

    Ok(())
}

fn remove_task(output: &Output, id: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();

    let tasks = store.read_all()?;
    let graph = DependencyGraph::from_tasks(&tasks);
    let dependents = graph.dependents(id);

    if !store.remove(id)? {
        anyhow::bail!("Task not found: {}", id);
    }

    if !dependents.is_empty() {
        output.warning(&format!(
            "{} is still listed as a dependency by: {}",
            id,
            dependents.join(", ")
        ));
    }

    output.success(&format!("Removed task: {}", id));
    Ok(())
}
