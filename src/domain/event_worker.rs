//! Background worker persisting redirect events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::redirect_event::RedirectEvent;
use crate::domain::repositories::RedirectEventRepository;

const MAX_RETRIES: usize = 3;

/// Drains the redirect event queue into the event log.
///
/// Each event is written with up to [`MAX_RETRIES`] retries (exponential backoff
/// with jitter). An event that still fails is logged and dropped; the worker
/// keeps running until every sender is gone.
pub async fn run_event_worker(
    mut rx: mpsc::Receiver<RedirectEvent>,
    repository: Arc<dyn RedirectEventRepository>,
) {
    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(50)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(MAX_RETRIES);

        let result = Retry::start(strategy, || {
            let repository = repository.clone();
            let event = event.clone();
            async move { repository.record(event).await }
        })
        .await;

        match result {
            Ok(()) => debug!(alias = %event.alias, "Redirect event recorded"),
            Err(e) => {
                metrics::counter!("redirect_events_failed_total").increment(1);
                warn!(alias = %event.alias, error = %e, "Dropping redirect event after retries");
            }
        }
    }

    info!("Redirect event worker stopped");
}
