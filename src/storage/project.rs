//! Project management
//!
//! Handles project initialization and provides access to the task store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, TaskStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a taskrank project. Run 'taskrank init' first.")]
    NotInProject,
}

/// A taskrank project
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(".taskrank");

        if !project_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        Ok(Self { root })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(".taskrank");

        fs::create_dir_all(&project_dir).with_context(|| {
            format!(
                "Failed to create .taskrank directory: {}",
                project_dir.display()
            )
        })?;

        // Create default config
        let config_path = project_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# taskrank configuration

# Strategy used when --strategy is not given:
# fastest_wins, high_impact, deadline_driven, smart_balance
default_strategy = "smart_balance"

# Number of tasks shown by 'taskrank suggest'
suggest_limit = 3
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // Create an empty task store so the layout is visible
        let store = TaskStore::for_project(&root);
        if !store.path().exists() {
            store.write_all(&[])?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .taskrank directory path
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(".taskrank")
    }

    /// Returns the task store
    pub fn task_store(&self) -> TaskStore {
        TaskStore::for_project(&self.root)
    }
}
