//! PostgreSQL repository implementations.
//!
//! Queries are bound at runtime with `sqlx::query_as`, so building the crate
//! does not need a live database.
//!
//! # Repositories
//!
//! - [`PgAliasRepository`] - Alias storage and lookup
//! - [`PgStatsRepository`] - Per-alias counters
//! - [`PgRedirectEventRepository`] - Redirect event log

pub mod pg_alias_repository;
pub mod pg_event_repository;
pub mod pg_stats_repository;

pub use pg_alias_repository::PgAliasRepository;
pub use pg_event_repository::PgRedirectEventRepository;
pub use pg_stats_repository::PgStatsRepository;
