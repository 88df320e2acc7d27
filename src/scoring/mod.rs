//! # Scoring
//!
//! Priority scoring for task batches.
//!
//! ## Pipeline
//!
//! ```text
//! batch ──► DependencyGraph ──► cycles, blocking counts   (once per batch)
//!   │
//!   └─► per task: urgency, importance, effort, dependency  (features)
//!                 ──► weighted sum × 100, rounded          (Weights)
//!                 ──► explanation + cycle note
//!   ──► stable sort, highest score first                   (Ranking)
//! ```
//!
//! ## Strategies
//!
//! | Name | Urgency | Importance | Effort | Dependency |
//! |------|---------|------------|--------|------------|
//! | `fastest_wins` | 0.2 | 0.2 | 0.5 | 0.1 |
//! | `high_impact` | 0.2 | 0.6 | 0.1 | 0.1 |
//! | `deadline_driven` | 0.7 | 0.15 | 0.1 | 0.05 |
//! | `smart_balance` | 0.35 | 0.35 | 0.2 | 0.1 |
//!
//! Unknown strategy names fall back to `smart_balance`.

mod features;
mod strategy;
mod engine;

pub use features::{
    blocking_step, dependency_score, effort_score, importance_score, urgency_score,
    BlockingCounts, FeatureScores,
};
pub use strategy::{Strategy, StrategyError, Weights};
pub use engine::{
    explain, rank, rank_by_name, round2, Priority, RankError, Ranker, Ranking, ScoredTask,
    CYCLE_NOTE,
};
