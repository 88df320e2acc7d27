//! # Storage Layer
//!
//! Reading task batches and persisting a local task list.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Batches | JSON array, JSONL or YAML | any file, or stdin |
//! | Tasks | JSONL (one JSON per line) | `.taskrank/tasks.jsonl` |
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
//! - [`BatchSource`] - Read a batch from a file or stdin
//! - [`Config`] - Project and global configuration

mod jsonl;
mod batch;
mod config;
mod project;

pub use jsonl::TaskStore;
pub use batch::{parse_inputs, BatchFormat, BatchSource};
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig};
pub use project::{Project, ProjectError};
