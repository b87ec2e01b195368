//! Business logic services for the application layer.

pub mod alias_service;
pub mod stats_service;

pub use alias_service::AliasService;
pub use stats_service::{StatsRunReport, StatsService};
