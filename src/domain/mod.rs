//! Domain layer containing entities, decision logic, and repository contracts.
//!
//! Nothing in this layer depends on HTTP or on a particular storage engine.
//!
//! # Architecture
//!
//! - [`entities`] - Alias and stats records
//! - [`resolver`] - Alias resolution/mutation state machine
//! - [`reconciler`] - Stats key-set reconciliation
//! - [`authorization`] - Shared write secret
//! - [`repositories`] - Data access trait definitions
//! - [`redirect_event`] - Redirect telemetry event model
//! - [`observer`] - Post-resolution observers
//! - [`event_worker`] - Asynchronous redirect event persistence
//!
//! # Redirect Event Flow
//!
//! 1. [`resolver::AliasResolver`] produces a [`redirect_event::RedirectEvent`]
//! 2. The event is handed to an [`observer::RedirectObserver`] (fire-and-forget)
//! 3. [`event_worker::run_event_worker`] persists it with retry logic
//! 4. The stats pass folds persisted events into per-alias counters

pub mod authorization;
pub mod entities;
pub mod event_worker;
pub mod observer;
pub mod reconciler;
pub mod redirect_event;
pub mod repositories;
pub mod resolver;
