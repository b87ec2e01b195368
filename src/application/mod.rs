//! Application layer orchestrating domain logic over repositories.
//!
//! # Modules
//!
//! - [`services::alias_service::AliasService`] - Alias resolution and publishing
//! - [`services::stats_service::StatsService`] - Stats reconciliation and hit-count refresh
//! - [`scheduler`] - Periodic stats pass

pub mod scheduler;
pub mod services;
