//! Per-alias hit counter entity.

use chrono::{DateTime, Utc};

/// Partition that holds every stats record.
pub const STATS_PARTITION_KEY: &str = "stats";

/// Timestamp used for "never happened".
pub const UNSET_TIMESTAMP: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// Hit counter for one alias.
///
/// `alias` is expected to name an existing alias row key, but nothing enforces it:
/// a counter outlives its alias until the stats pass drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRecord {
    pub partition_key: String,
    pub alias: String,
    pub count: u64,
    /// End of the last event window folded into `count`.
    pub last_update_end_time: DateTime<Utc>,
    /// Time of the most recent event counted for the alias.
    pub last_result_captured: DateTime<Utc>,
}

impl StatsRecord {
    /// Creates an empty counter for `alias`.
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            partition_key: STATS_PARTITION_KEY.to_string(),
            alias: alias.into(),
            count: 0,
            last_update_end_time: UNSET_TIMESTAMP,
            last_result_captured: UNSET_TIMESTAMP,
        }
    }

    /// Returns true if no event window has been folded in yet.
    pub fn is_fresh(&self) -> bool {
        self.last_update_end_time == UNSET_TIMESTAMP
    }
}
