use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Tunables of the scheduling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// First candidate start time scanned by the global slot finder.
    pub window_start: NaiveTime,
    /// Candidate start times are strictly before this.
    pub window_end: NaiveTime,
    /// Days scanned for alternatives, the requested date included.
    pub alternative_days: u32,
    /// Alternatives returned per failed specialty.
    pub max_alternatives: usize,
    /// Times a mutation is re-planned after a concurrent conflict.
    pub max_commit_attempts: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            window_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            window_end: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN),
            alternative_days: 7,
            max_alternatives: 5,
            max_commit_attempts: 3,
        }
    }
}
