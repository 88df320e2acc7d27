//! Task domain model
//!
//! A task is the unit being ranked. Only `due_date`, `estimated_hours`,
//! `importance` and `dependencies` feed into scoring; `title` is carried
//! along for display.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Importance assumed when a record does not provide one
pub const DEFAULT_IMPORTANCE: i64 = 5;

/// Estimated hours assumed when a record does not provide them
pub const DEFAULT_ESTIMATED_HOURS: f64 = 1.0;

fn default_importance() -> Option<i64> {
    Some(DEFAULT_IMPORTANCE)
}

fn default_estimated_hours() -> Option<f64> {
    Some(DEFAULT_ESTIMATED_HOURS)
}

/// A task as seen by the ranking engine
///
/// `estimated_hours` and `importance` are optional: an explicit null is kept
/// as `None` and scored with the neutral defaults, while a missing field takes
/// the record defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within a batch
    pub id: String,

    /// Human-readable title (not used in scoring)
    pub title: String,

    /// Optional due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Estimated effort in hours
    #[serde(default = "default_estimated_hours")]
    pub estimated_hours: Option<f64>,

    /// Importance, nominally 1-10
    #[serde(default = "default_importance")]
    pub importance: Option<i64>,

    /// IDs of tasks this task depends on, in the order given
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Task {
    /// Creates a task with default effort and importance and no due date
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: None,
            estimated_hours: Some(DEFAULT_ESTIMATED_HOURS),
            importance: Some(DEFAULT_IMPORTANCE),
            dependencies: Vec::new(),
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Adds a dependency on another task (duplicates are kept as given)
    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        self.dependencies.push(task_id.into());
        self
    }
}

/// Parses an ISO-8601 date or date-time into a calendar date
///
/// Accepts `YYYY-MM-DD`, naive date-times with a `T` or space separator,
/// and RFC 3339 timestamps with an offset. Anything else yields `None`.
pub fn parse_due_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.date_naive())
}
