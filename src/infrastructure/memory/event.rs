use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::redirect_event::RedirectEvent;
use crate::domain::repositories::{EventSummary, RedirectEventRepository};
use crate::error::AppError;

/// In-process redirect event log.
#[derive(Default)]
pub struct InMemoryRedirectEventRepository {
    events: RwLock<Vec<RedirectEvent>>,
}

impl InMemoryRedirectEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events recorded so far.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl RedirectEventRepository for InMemoryRedirectEventRepository {
    async fn record(&self, event: RedirectEvent) -> Result<(), AppError> {
        self.events.write().await.push(event);
        Ok(())
    }

    async fn summarize(
        &self,
        alias: &str,
        after: DateTime<Utc>,
        up_to: DateTime<Utc>,
    ) -> Result<EventSummary, AppError> {
        let events = self.events.read().await;

        Ok(events
            .iter()
            .filter(|e| e.alias == alias && e.occurred_at > after && e.occurred_at <= up_to)
            .fold(EventSummary::default(), |mut summary, e| {
                summary.count += 1;
                summary.latest = summary.latest.max(Some(e.occurred_at));
                summary
            }))
    }

    async fn purge_up_to(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.occurred_at > cutoff);
        Ok((before - events.len()) as u64)
    }
}
