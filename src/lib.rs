//! taskrank - rank tasks by priority and find circular dependencies
//!
//! Each task in a batch gets a composite score from its urgency (due date),
//! importance, estimated effort and how many other tasks it blocks, weighted
//! by a named strategy. Dependency cycles in the batch are reported and the
//! tasks caught in them are flagged.

pub mod domain;
pub mod scoring;
pub mod storage;
pub mod cli;

pub use domain::{Batch, Cycles, DependencyGraph, Task, TaskInput};
pub use scoring::{rank, Priority, Ranker, Ranking, ScoredTask, Strategy, Weights};
