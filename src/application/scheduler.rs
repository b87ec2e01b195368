//! Periodic stats pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::application::services::StatsService;

/// Runs [`StatsService::run_once`] every `period`, forever.
///
/// Each tick awaits the previous pass, so passes never overlap; ticks missed
/// while a pass is running are skipped. A failed pass is logged and the next
/// tick proceeds normally.
pub async fn run_stats_scheduler(
    service: Arc<StatsService>,
    period: Duration,
    prune_orphans: bool,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        period_secs = period.as_secs(),
        prune_orphans, "Stats scheduler started"
    );

    loop {
        ticker.tick().await;

        if let Err(e) = service.run_once(prune_orphans).await {
            metrics::counter!("stats_pass_failures_total").increment(1);
            error!(error = %e, "Stats pass failed");
        }
    }
}
