//! Domain models for taskrank
//!
//! Contains the task model, batch intake and the dependency graph, without
//! any I/O concerns.

mod id;
mod task;
mod intake;
mod graph;

pub use id::{is_temporary, new_task_id, temporary_id, TASK_ID_PREFIX, TEMP_ID_PREFIX};
pub use task::{parse_due_date, Task, DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE};
pub use intake::{Batch, IntakeError, RecordError, TaskInput};
pub use graph::{Cycle, Cycles, DependencyGraph};
