//! Repository trait for recorded redirect events.

use crate::domain::redirect_event::RedirectEvent;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Events counted for one alias within a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventSummary {
    pub count: u64,
    /// `occurred_at` of the newest event in the window.
    pub latest: Option<DateTime<Utc>>,
}

/// Repository interface for the redirect event log.
///
/// Fed by [`crate::domain::event_worker::run_event_worker`], read by the stats
/// pass to advance hit counters. Events already folded into every counter are
/// purged by the same pass.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectEventRepository: Send + Sync {
    /// Appends one event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record(&self, event: RedirectEvent) -> Result<(), AppError>;

    /// Summarizes the events for `alias` with `after < occurred_at <= up_to`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn summarize(
        &self,
        alias: &str,
        after: DateTime<Utc>,
        up_to: DateTime<Utc>,
    ) -> Result<EventSummary, AppError>;

    /// Deletes every event with `occurred_at <= cutoff` and returns how many
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn purge_up_to(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}
