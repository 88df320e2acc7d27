//! Intake of loosely-typed task records
//!
//! Batches arrive as JSON or YAML written by people and other tools, so field
//! types are not trusted. [`TaskInput`] accepts whatever shape a field has and
//! coerces it the same way for every format:
//!
//! | Field | Accepted | Fallback |
//! |-------|----------|----------|
//! | `id` | string or integer | temporary `__tmp__` ID |
//! | `title` | non-empty string or number | record rejected |
//! | `due_date` | ISO-8601 string | no due date |
//! | `estimated_hours` | number or numeric string | `1.0` |
//! | `importance` | integer, float (truncated) or numeric string | `5` |
//! | `dependencies` | list of strings or integers | empty list |
//!
//! [`Batch::from_inputs`] turns a sequence of inputs into ranked-ready tasks,
//! reporting every rejected record at once.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::id::temporary_id;
use super::task::{parse_due_date, Task, DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE};

/// A problem with one record of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordError {
    /// Position of the record in the submitted batch
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum IntakeError {
    #[error("Invalid task records: {}", summarize(.0))]
    InvalidRecords(Vec<RecordError>),
}

fn summarize(errors: &[RecordError]) -> String {
    errors
        .iter()
        .map(|e| format!("#{}: {}", e.index, e.error))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Any scalar or list a record field might hold
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Loose>),
    Other(serde::de::IgnoredAny),
}

impl Loose {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Loose::Int(i) => Some(*i as f64),
            Loose::Float(f) => Some(*f),
            Loose::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|f| !f.is_nan())
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Loose::Bool(b) => Some(i64::from(*b)),
            Loose::Int(i) => Some(*i),
            Loose::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Loose::Str(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Text form for identifiers and titles
    fn as_text(&self) -> Option<String> {
        match self {
            Loose::Str(s) => Some(s.clone()),
            Loose::Int(i) => Some(i.to_string()),
            Loose::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }
}

fn loose_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?
        .and_then(|v| v.as_text())
        .filter(|s| !s.is_empty()))
}

fn loose_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        Some(Loose::Str(s)) => parse_due_date(&s),
        _ => None,
    })
}

fn loose_hours<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?
        .and_then(|v| v.as_f64())
        .unwrap_or(DEFAULT_ESTIMATED_HOURS))
}

fn loose_importance<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?
        .and_then(|v| v.as_i64())
        .unwrap_or(DEFAULT_IMPORTANCE))
}

fn loose_dependencies<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        Some(Loose::List(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Loose::Str(s) => Some(s),
                Loose::Int(i) => Some(i.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn default_estimated_hours() -> f64 {
    DEFAULT_ESTIMATED_HOURS
}

fn default_importance() -> i64 {
    DEFAULT_IMPORTANCE
}

/// A task record as submitted, before IDs and titles are checked
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskInput {
    #[serde(default, deserialize_with = "loose_text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "loose_date")]
    pub due_date: Option<NaiveDate>,

    #[serde(default = "default_estimated_hours", deserialize_with = "loose_hours")]
    pub estimated_hours: f64,

    #[serde(default = "default_importance", deserialize_with = "loose_importance")]
    pub importance: i64,

    #[serde(default, deserialize_with = "loose_dependencies")]
    pub dependencies: Vec<String>,
}

impl TaskInput {
    /// Converts the record at `index` into a task
    ///
    /// A missing ID is replaced with a temporary one; a missing title rejects
    /// the record.
    pub fn into_task(self, index: usize, now: DateTime<Utc>) -> Result<Task, RecordError> {
        let Some(title) = self.title else {
            return Err(RecordError {
                index,
                error: "missing title".to_string(),
            });
        };

        let id = self
            .id
            .unwrap_or_else(|| temporary_id(index, &title, now));

        Ok(Task {
            id,
            title,
            due_date: self.due_date,
            estimated_hours: Some(self.estimated_hours),
            importance: Some(self.importance),
            dependencies: self.dependencies,
        })
    }
}

/// An ordered batch of tasks ready for ranking
#[derive(Debug, Clone, Default)]
pub struct Batch {
    tasks: Vec<Task>,
    warnings: Vec<String>,
}

impl Batch {
    /// Builds a batch from submitted records, using the current time for
    /// temporary IDs
    pub fn from_inputs(inputs: impl IntoIterator<Item = TaskInput>) -> Result<Self, IntakeError> {
        Self::from_inputs_at(inputs, Utc::now())
    }

    /// Builds a batch from submitted records
    pub fn from_inputs_at(
        inputs: impl IntoIterator<Item = TaskInput>,
        now: DateTime<Utc>,
    ) -> Result<Self, IntakeError> {
        let mut tasks = Vec::new();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (index, input) in inputs.into_iter().enumerate() {
            let had_id = input.id.is_some();
            match input.into_task(index, now) {
                Ok(task) => {
                    if !had_id {
                        warnings.push(format!(
                            "record #{} has no id, assigned {}",
                            index, task.id
                        ));
                    }
                    tasks.push(task);
                }
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(IntakeError::InvalidRecords(errors));
        }

        let mut batch = Self { tasks, warnings };
        batch.warn_duplicates();
        Ok(batch)
    }

    /// Builds a batch from tasks that are already well-typed
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut batch = Self {
            tasks,
            warnings: Vec::new(),
        };
        batch.warn_duplicates();
        batch
    }

    fn warn_duplicates(&mut self) {
        for id in self.duplicate_ids() {
            self.warnings.push(format!(
                "duplicate id '{}': records share one entry in dependency lookup",
                id
            ));
        }
    }

    /// IDs used by more than one task, in order of their second occurrence
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut dups = Vec::new();
        for task in &self.tasks {
            if !seen.insert(task.id.as_str()) && reported.insert(task.id.as_str()) {
                dups.push(task.id.clone());
            }
        }
        dups
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Non-fatal observations made while building the batch
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
