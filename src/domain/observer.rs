//! Post-resolution observers for redirect telemetry.
//!
//! Observers run after the redirect outcome is decided. Their failures are
//! logged by the caller and never change the response.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::redirect_event::RedirectEvent;

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("redirect event queue is full")]
    QueueFull,

    #[error("redirect event queue is closed")]
    QueueClosed,
}

/// Receives an event for every successful read-path resolution.
pub trait RedirectObserver: Send + Sync {
    /// Must not block.
    fn observe(&self, event: RedirectEvent) -> Result<(), ObserverError>;
}

/// Forwards events to the background event worker over a bounded channel.
///
/// When the queue is full the event is dropped.
#[derive(Clone)]
pub struct ChannelObserver {
    sender: mpsc::Sender<RedirectEvent>,
}

impl ChannelObserver {
    pub fn new(sender: mpsc::Sender<RedirectEvent>) -> Self {
        Self { sender }
    }

    /// Returns true if the worker side has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl RedirectObserver for ChannelObserver {
    fn observe(&self, event: RedirectEvent) -> Result<(), ObserverError> {
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ObserverError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => ObserverError::QueueClosed,
        })
    }
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RedirectObserver for NullObserver {
    fn observe(&self, _event: RedirectEvent) -> Result<(), ObserverError> {
        Ok(())
    }
}
