//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Task | Stored task list | `task add`, `task list`, `task remove` |
//! | Ranking | Scoring a batch | `analyze`, `suggest`, `cycles` |
//! | Reference | Preset weights | `strategies` |
//!
//! Ranking commands take a batch file (`.json`, `.jsonl`, `.yaml`), `-` for
//! stdin, or nothing to rank the project's stored tasks:
//! ```bash
//! taskrank analyze tasks.json --strategy deadline_driven --today 2025-11-15
//! cat tasks.json | taskrank suggest - -n 5
//! ```
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod task;
mod rank;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
