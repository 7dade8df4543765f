//! Utility functions for the evaluator

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique player ID
pub fn generate_player_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Worker count used when no concurrency bound is configured
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
