//! Redirect event model for asynchronous telemetry.

use chrono::{DateTime, Utc};

use crate::domain::entities::AliasRecord;

/// One successful read-path resolution.
///
/// Produced by the resolver, handed to a [`crate::domain::observer::RedirectObserver`]
/// after the response is decided, and eventually persisted by
/// [`crate::domain::event_worker::run_event_worker`].
///
/// # Usage Flow
///
/// 1. Built by [`crate::domain::resolver::AliasResolver`] on a redirect
/// 2. Passed to the observer (non-blocking, failures ignored)
/// 3. Drained from the queue by the event worker
/// 4. Counted into [`crate::domain::entities::StatsRecord`] by the stats pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEvent {
    /// Alias text as requested.
    pub alias: String,
    pub partition_key: String,
    pub row_key: String,
    pub url: String,
    pub occurred_at: DateTime<Utc>,
}

impl RedirectEvent {
    /// Captures a redirect served from `record`.
    pub fn new(alias: &str, record: &AliasRecord, occurred_at: DateTime<Utc>) -> Self {
        Self {
            alias: alias.to_string(),
            partition_key: record.partition_key.clone(),
            row_key: record.row_key().to_string(),
            url: record.url.clone(),
            occurred_at,
        }
    }
}
