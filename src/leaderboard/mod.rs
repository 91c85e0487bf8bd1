//! Persisted high-score table
//!
//! Scores live in a plain text file, one `"name" score` line each, and are
//! kept ranked by score (highest first) with ties broken by name.

pub mod entry;
pub mod format;
pub mod store;

pub use entry::{DEFAULT_NAME, MAX_NAME_LEN, ScoreEntry, ranking, sanitize_name};
pub use store::Leaderboard;
