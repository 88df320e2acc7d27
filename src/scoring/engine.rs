//! Ranking engine
//!
//! Scores every task of a batch, explains each score, flags tasks caught in
//! dependency cycles and sorts the result by score (highest first).

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::features::{BlockingCounts, FeatureScores};
use super::strategy::{Strategy, Weights};
use crate::domain::{Cycles, DependencyGraph, Task};

/// Appended to the explanation of tasks that take part in a cycle
pub const CYCLE_NOTE: &str = " | Note: involved in circular dependency";

#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("Task at index {index} has an empty id")]
    EmptyId { index: usize },
}

/// Priority band of a composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Lowest score in the high band
    pub const HIGH_FROM: f64 = 70.0;

    /// Lowest score in the medium band
    pub const MEDIUM_FROM: f64 = 40.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_FROM {
            Priority::High
        } else if score >= Self::MEDIUM_FROM {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One task with its composite score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredTask<'a> {
    pub task: &'a Task,

    /// Composite score on a 0-100+ scale, rounded to two decimals
    pub score: f64,

    pub priority: Priority,

    pub explanation: String,

    pub circular_dependency: bool,

    /// Raw feature scores behind the composite
    #[serde(skip)]
    pub features: FeatureScores,
}

/// Result of ranking a batch
#[derive(Debug, Clone, Serialize)]
pub struct Ranking<'a> {
    /// Tasks sorted by score, highest first; ties keep batch order
    pub results: Vec<ScoredTask<'a>>,

    pub cycles: Cycles,
}

impl<'a> Ranking<'a> {
    /// The `n` highest-scoring tasks
    pub fn top(&self, n: usize) -> &[ScoredTask<'a>] {
        &self.results[..n.min(self.results.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

/// Scores batches with fixed weights against a fixed reference date
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    weights: Weights,
    today: NaiveDate,
}

impl Ranker {
    pub fn new(strategy: Strategy, today: NaiveDate) -> Self {
        Self::with_weights(strategy.weights(), today)
    }

    pub fn with_weights(weights: Weights, today: NaiveDate) -> Self {
        Self { weights, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Ranks a batch
    ///
    /// Cycle detection and blocking counts run once for the whole batch.
    pub fn rank<'a>(&self, tasks: &'a [Task]) -> Result<Ranking<'a>, RankError> {
        if let Some(index) = tasks.iter().position(|t| t.id.is_empty()) {
            return Err(RankError::EmptyId { index });
        }

        let graph = DependencyGraph::from_tasks(tasks);
        let cycles = graph.find_cycles();
        let blocking = BlockingCounts::from_graph(&graph);

        let mut results: Vec<ScoredTask<'a>> = {
            let in_cycle = cycles.members();
            tasks
                .iter()
                .map(|task| {
                    let features = FeatureScores::for_task(task, self.today, &blocking);
                    let circular = in_cycle.contains(task.id.as_str());
                    let score = round2(self.weights.combine(&features) * 100.0);
                    ScoredTask {
                        task,
                        score,
                        priority: Priority::from_score(score),
                        explanation: explain(&features, &self.weights, circular),
                        circular_dependency: circular,
                        features,
                    }
                })
                .collect()
        };

        // sort_by is stable, so equal scores keep batch order
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(Ranking { results, cycles })
    }
}

/// Ranks a batch with a preset strategy
pub fn rank(tasks: &[Task], strategy: Strategy, today: NaiveDate) -> Result<Ranking<'_>, RankError> {
    Ranker::new(strategy, today).rank(tasks)
}

/// Ranks a batch with a strategy name; unknown names use `smart_balance`
pub fn rank_by_name<'a>(
    tasks: &'a [Task],
    strategy: &str,
    today: NaiveDate,
) -> Result<Ranking<'a>, RankError> {
    rank(tasks, Strategy::resolve(strategy), today)
}

/// Builds the `feature(value)*weight` explanation of a score
///
/// The dependency term is left out when the task blocks nothing.
pub fn explain(features: &FeatureScores, weights: &Weights, circular: bool) -> String {
    let mut parts = vec![
        term("urgency", features.urgency, weights.urgency),
        term("importance", features.importance, weights.importance),
        term("effort", features.effort, weights.effort),
    ];
    if features.dependency > 0.0 {
        parts.push(term("dependency", features.dependency, weights.dependency));
    }

    let mut explanation = parts.join("; ");
    if circular {
        explanation.push_str(CYCLE_NOTE);
    }
    explanation
}

fn term(name: &str, value: f64, weight: f64) -> String {
    format!("{}({})*{}", name, decimal(round2(value)), decimal(weight))
}

/// Rounds to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats a number with at least one decimal place (`1.0`, `0.35`)
fn decimal(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains(['.', 'e']) {
        format!("{}.0", text)
    } else {
        text
    }
}
