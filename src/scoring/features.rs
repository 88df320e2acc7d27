//! Per-task feature scores
//!
//! Each scorer maps one property of a task to a number that the ranking
//! engine weighs:
//!
//! | Feature | Range | Higher means |
//! |---------|-------|--------------|
//! | urgency | 0.0 - 1.5 | due sooner, or overdue |
//! | importance | 0.0 - 1.0 | more important |
//! | effort | 0.0 - 1.0 | quicker to finish |
//! | dependency | 0.0, 0.6, 1.0 | blocks more tasks |

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{DependencyGraph, Task};

/// Days over which urgency decays from 1.0 (due today) to 0.0
pub const URGENCY_WINDOW_DAYS: f64 = 30.0;

/// Extra urgency per day past the due date
pub const OVERDUE_BOOST_PER_DAY: f64 = 0.02;

/// Cap on the overdue bonus
pub const MAX_OVERDUE_BOOST: f64 = 0.5;

/// Urgency of a task without a due date
pub const NO_DUE_DATE_URGENCY: f64 = 0.2;

/// Importance score when no importance is known
pub const UNKNOWN_IMPORTANCE_SCORE: f64 = 0.5;

/// Hours at which the effort score is exactly 0.5
const EFFORT_MIDPOINT_HOURS: f64 = 4.0;

/// Steepness of the effort curve
const EFFORT_STEEPNESS: f64 = 0.25;

/// Urgency from the due date relative to `today`
pub fn urgency_score(due_date: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(due_date) = due_date else {
        return NO_DUE_DATE_URGENCY;
    };

    let days = (due_date - today).num_days();
    if days >= 0 {
        (1.0 - days as f64 / URGENCY_WINDOW_DAYS).clamp(0.0, 1.0)
    } else {
        let overdue = days.unsigned_abs() as f64;
        1.0 + (overdue * OVERDUE_BOOST_PER_DAY).min(MAX_OVERDUE_BOOST)
    }
}

/// Importance normalized from the nominal 1-10 scale to [0, 1]
pub fn importance_score(importance: Option<i64>) -> f64 {
    match importance {
        Some(value) => (value as f64 / 10.0).clamp(0.0, 1.0),
        None => UNKNOWN_IMPORTANCE_SCORE,
    }
}

/// Quick-win score: a logistic curve falling from ~1 to 0 as hours grow
pub fn effort_score(estimated_hours: Option<f64>) -> f64 {
    match estimated_hours {
        Some(hours) if hours > 0.0 => {
            1.0 / (1.0 + (EFFORT_STEEPNESS * (hours - EFFORT_MIDPOINT_HOURS)).exp())
        }
        _ => 1.0,
    }
}

/// Maps a number of dependents to the blocking score
pub fn blocking_step(dependents: usize) -> f64 {
    match dependents {
        0 => 0.0,
        1 => 0.6,
        _ => 1.0,
    }
}

/// Blocking score of `task_id` within `batch`
///
/// Convenience for one-off queries; the ranking engine shares a single
/// [`BlockingCounts`] across the batch instead.
pub fn dependency_score(task_id: &str, batch: &[Task]) -> f64 {
    BlockingCounts::from_graph(&DependencyGraph::from_tasks(batch)).score(task_id)
}

/// Number of dependents for every task of a batch
#[derive(Debug, Clone, Default)]
pub struct BlockingCounts {
    counts: HashMap<String, usize>,
}

impl BlockingCounts {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let counts = graph
            .task_ids()
            .map(|id| (id.to_string(), graph.dependent_count(id)))
            .collect();
        Self { counts }
    }

    /// How many other tasks in the batch depend on `task_id`
    pub fn count(&self, task_id: &str) -> usize {
        self.counts.get(task_id).copied().unwrap_or(0)
    }

    pub fn score(&self, task_id: &str) -> f64 {
        blocking_step(self.count(task_id))
    }
}

/// The four feature scores of one task
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureScores {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

impl FeatureScores {
    /// Scores a task against a reference date and shared blocking counts
    pub fn for_task(task: &Task, today: NaiveDate, blocking: &BlockingCounts) -> Self {
        Self {
            urgency: urgency_score(task.due_date, today),
            importance: importance_score(task.importance),
            effort: effort_score(task.estimated_hours),
            dependency: blocking.score(&task.id),
        }
    }
}
