//! Task ID generation
//!
//! ID Format:
//! - Stored tasks created without an explicit ID: `t-{7-char-hash}`
//! - Batch records submitted without an ID: `__tmp__{12-char-hash}`
//!
//! Hashes are derived from the title plus a timestamp (and the record index
//! for batch records), so the same title at different times gets different IDs.

use chrono::{DateTime, Utc};

/// Prefix marking IDs assigned to batch records that arrived without one
pub const TEMP_ID_PREFIX: &str = "__tmp__";

/// Prefix for generated IDs of stored tasks
pub const TASK_ID_PREFIX: &str = "t-";

/// Generates a hex hash of `len` characters from a seed and timestamp
fn generate_hash(seed: &str, timestamp: DateTime<Utc>, len: usize) -> String {
    let input = format!("{}{}", seed, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..len].to_string()
}

/// Creates an ID for a stored task from its title and creation time
pub fn new_task_id(title: &str, timestamp: DateTime<Utc>) -> String {
    format!("{}{}", TASK_ID_PREFIX, generate_hash(title, timestamp, 7))
}

/// Creates a temporary ID for the batch record at `index`
pub fn temporary_id(index: usize, title: &str, timestamp: DateTime<Utc>) -> String {
    let seed = format!("{}:{}", index, title);
    format!("{}{}", TEMP_ID_PREFIX, generate_hash(&seed, timestamp, 12))
}

/// Returns true if the ID was assigned by [`temporary_id`]
pub fn is_temporary(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}
