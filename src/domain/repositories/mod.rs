//! Repository trait definitions for the domain layer.
//!
//! These traits are the only storage surface the core depends on. Concrete
//! implementations live in `crate::infrastructure`.
//!
//! # Available Repositories
//!
//! - [`AliasRepository`] - Alias lookups and unconditional upserts
//! - [`StatsRepository`] - Stats enumeration, upsert and deletion
//! - [`RedirectEventRepository`] - Redirect event log
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod alias_repository;
pub mod event_repository;
pub mod stats_repository;

pub use alias_repository::AliasRepository;
pub use event_repository::{EventSummary, RedirectEventRepository};
pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use alias_repository::MockAliasRepository;
#[cfg(test)]
pub use event_repository::MockRedirectEventRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
