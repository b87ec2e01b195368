use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AliasService, StatsService};
use crate::domain::redirect_event::RedirectEvent;

/// Shared handler state.
///
/// `event_sender` is the same channel the [`AliasService`] observer writes to;
/// it is kept here so the health check can inspect the queue.
#[derive(Clone)]
pub struct AppState {
    pub alias_service: Arc<AliasService>,
    pub stats_service: Arc<StatsService>,
    pub event_sender: mpsc::Sender<RedirectEvent>,
}

impl AppState {
    pub fn new(
        alias_service: Arc<AliasService>,
        stats_service: Arc<StatsService>,
        event_sender: mpsc::Sender<RedirectEvent>,
    ) -> Self {
        Self {
            alias_service,
            stats_service,
            event_sender,
        }
    }
}
