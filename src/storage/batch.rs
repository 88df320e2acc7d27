//! Batch file readers
//!
//! A batch can come from a file or from stdin (`-`). The format follows the
//! file extension; stdin and unknown extensions are read as JSON.
//!
//! | Extension | Format |
//! |-----------|--------|
//! | `.json` | JSON array of task records |
//! | `.jsonl`, `.ndjson` | one JSON record per line |
//! | `.yaml`, `.yml` | YAML sequence of task records |

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::TaskInput;

/// Encoding of a batch file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchFormat {
    #[default]
    Json,
    JsonLines,
    Yaml,
}

impl BatchFormat {
    /// Picks the format from a path's extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("jsonl") | Some("ndjson") => BatchFormat::JsonLines,
            Some("yaml") | Some("yml") => BatchFormat::Yaml,
            _ => BatchFormat::Json,
        }
    }
}

/// Where a batch is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    Stdin,
    File(PathBuf),
}

impl BatchSource {
    /// `-` means stdin, anything else is a file path
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            BatchSource::Stdin
        } else {
            BatchSource::File(PathBuf::from(arg))
        }
    }

    pub fn format(&self) -> BatchFormat {
        match self {
            BatchSource::Stdin => BatchFormat::Json,
            BatchSource::File(path) => BatchFormat::from_path(path),
        }
    }

    /// Reads and parses every record of the batch
    pub fn read(&self) -> Result<Vec<TaskInput>> {
        let content = match self {
            BatchSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read batch from stdin")?;
                buf
            }
            BatchSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read batch file: {}", path.display()))?,
        };

        parse_inputs(&content, self.format()).with_context(|| match self {
            BatchSource::Stdin => "Failed to parse batch from stdin".to_string(),
            BatchSource::File(path) => format!("Failed to parse batch file: {}", path.display()),
        })
    }
}

/// Parses batch content in the given format
pub fn parse_inputs(content: &str, format: BatchFormat) -> Result<Vec<TaskInput>> {
    match format {
        BatchFormat::Json => {
            if content.trim().is_empty() {
                return Ok(Vec::new());
            }
            serde_json::from_str(content).context("Expected a JSON array of tasks")
        }
        BatchFormat::JsonLines => {
            let mut inputs = Vec::new();
            for (line_num, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let input: TaskInput = serde_json::from_str(line)
                    .with_context(|| format!("Failed to parse task at line {}", line_num + 1))?;
                inputs.push(input);
            }
            Ok(inputs)
        }
        BatchFormat::Yaml => {
            if content.trim().is_empty() {
                return Ok(Vec::new());
            }
            serde_yaml::from_str(content).context("Expected a YAML sequence of tasks")
        }
    }
}
